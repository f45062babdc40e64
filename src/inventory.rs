//! Per-owner inventory aggregation.
//!
//! Joins carts (by owner) → purchases (by cart) → products (by id), sums
//! quantities per product and classifies the result. This is the only place
//! the join happens; the inventory view and the ingredient list both read
//! from [`aggregate_inventory`].

use crate::config::StockThreshold;
use crate::models::{
    CartRecord, InventoryItem, InventoryReport, ProductRecord, PurchaseRecord, StockStatus,
};
use crate::stock::classify;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Build the inventory for `owner_id`.
///
/// Products referenced by the owner's purchases but missing from `products`
/// are left out of `items` and listed in `missing_products`; the rest of the
/// inventory is unaffected. An owner without carts or purchases gets an empty
/// report.
pub fn aggregate_inventory(
    owner_id: &str,
    carts: &[CartRecord],
    purchases: &[PurchaseRecord],
    products: &[ProductRecord],
    threshold: StockThreshold,
) -> InventoryReport {
    let owned_carts: HashSet<&str> = carts
        .iter()
        .filter(|c| c.owner_id == owner_id)
        .map(|c| c.cart_id.as_str())
        .collect();

    if owned_carts.is_empty() {
        tracing::debug!(owner_id, "owner has no carts");
        return InventoryReport::default();
    }

    // BTreeMap keeps the output ordered by product id across runs.
    let mut quantities: BTreeMap<&str, u64> = BTreeMap::new();
    for purchase in purchases
        .iter()
        .filter(|p| owned_carts.contains(p.cart_id.as_str()))
    {
        let total = quantities.entry(purchase.product_id.as_str()).or_insert(0);
        *total = total.saturating_add(purchase.quantity);
    }

    let catalog: HashMap<&str, &ProductRecord> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p))
        .collect();

    let mut report = InventoryReport::default();
    let mut missing: BTreeSet<String> = BTreeSet::new();

    for (product_id, quantity) in quantities {
        match catalog.get(product_id) {
            Some(product) => report.items.push(InventoryItem {
                product_id: product.product_id.clone(),
                name: product.name.clone(),
                category: product.category.clone(),
                unit_price: product.unit_price,
                aggregate_quantity: quantity,
                status: classify(quantity, threshold),
            }),
            None => {
                tracing::warn!(owner_id, product_id, "purchase references unknown product");
                missing.insert(product_id.to_string());
            }
        }
    }

    report.missing_products = missing.into_iter().collect();
    report
}

/// Product names usable as recipe ingredients: everything still in stock
/// (low or not), in inventory order.
pub fn ingredient_names(items: &[InventoryItem]) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.status != StockStatus::OutOfStock)
        .map(|item| item.name.clone())
        .collect()
}
