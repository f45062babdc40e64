use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CartRecord: Cart ownership row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRecord {
    pub cart_id: String,
    pub owner_id: String,
}

// ---------------------------------------------------------------------------
// PurchaseRecord: One purchase line inside a cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub purchase_id: String,
    pub cart_id: String,
    pub product_id: String,
    pub quantity: u64,
    pub unit_price: f64,
    pub category: String,
    pub purchased_at: NaiveDateTime,
}

impl PurchaseRecord {
    /// Line total: quantity × unit price.
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

// ---------------------------------------------------------------------------
// ProductRecord: Catalog entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub unit_price: f64,
}
