use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StockStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// InventoryItem: Per-product aggregate for one owner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub product_id: String,
    pub name: String,
    pub category: String,
    /// Current catalog price, not the price on the purchase lines.
    pub unit_price: f64,
    pub aggregate_quantity: u64,
    pub status: StockStatus,
}

// ---------------------------------------------------------------------------
// InventoryReport: Aggregator output plus integrity diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    /// Sorted by product id.
    pub items: Vec<InventoryItem>,
    /// Product ids referenced by the owner's purchases but absent from the
    /// catalog. Sorted, de-duplicated.
    pub missing_products: Vec<String>,
}

impl InventoryReport {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summary(&self) -> StockSummary {
        StockSummary::from_items(&self.items)
    }
}

// ---------------------------------------------------------------------------
// StockSummary: Header counts for the inventory view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

impl StockSummary {
    pub fn from_items(items: &[InventoryItem]) -> Self {
        let mut summary = StockSummary {
            total: items.len(),
            ..Default::default()
        };
        for item in items {
            match item.status {
                StockStatus::InStock => summary.in_stock += 1,
                StockStatus::LowStock => summary.low_stock += 1,
                StockStatus::OutOfStock => summary.out_of_stock += 1,
            }
        }
        summary
    }

    /// Share of items with the given status as a percentage, `None` for an
    /// empty inventory.
    pub fn percent(&self, status: StockStatus) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let count = match status {
            StockStatus::InStock => self.in_stock,
            StockStatus::LowStock => self.low_stock,
            StockStatus::OutOfStock => self.out_of_stock,
        };
        Some(count as f64 / self.total as f64 * 100.0)
    }
}
