//! Stock level classification.

use crate::config::StockThreshold;
use crate::models::StockStatus;

/// Classify an aggregate quantity against the low-stock threshold.
///
/// The threshold is inclusive: `quantity == threshold` is low stock.
/// Every consumer that shows a stock status goes through this function.
pub fn classify(quantity: u64, threshold: StockThreshold) -> StockStatus {
    if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity <= threshold.get() {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}
