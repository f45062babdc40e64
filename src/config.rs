//! Ledger file layout and validated analytics settings.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub fn table_files() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("carts", "carts.ndjson"),
        ("purchases", "purchases.ndjson"),
        ("products", "products.ndjson"),
    ])
}

/// Columns read from each ledger table file.
///
/// Every column is loaded as text; typing happens in the normalizer, so one
/// bad value drops one row instead of failing the whole load.
pub fn table_columns(table: &str) -> Option<&'static [&'static str]> {
    match table {
        "carts" => Some(&["cart_id", "user_id"]),
        "purchases" => Some(&[
            "purchase_id",
            "cart_id",
            "product_id",
            "product_quantity",
            "product_price",
            "product_category",
            "input_date",
        ]),
        "products" => Some(&["product_id", "product_name", "category", "unit_price"]),
        _ => None,
    }
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("grocery-ledger")
    } else {
        PathBuf::from(".grocery-ledger")
    }
}

// ---------------------------------------------------------------------------
// StockThreshold
// ---------------------------------------------------------------------------

/// Low-stock threshold: quantities at or below it (but above zero) are
/// classified as low stock.
///
/// There is deliberately no `Default`; the calling layer owns the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct StockThreshold(u64);

impl StockThreshold {
    /// Validate a raw threshold. Negative values are a configuration error.
    pub fn new(value: i64) -> Result<Self> {
        u64::try_from(value).map(Self).map_err(|_| {
            LedgerError::Configuration(format!(
                "low-stock threshold must be non-negative, got {}",
                value
            ))
        })
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for StockThreshold {
    type Error = LedgerError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<StockThreshold> for u64 {
    fn from(t: StockThreshold) -> u64 {
        t.0
    }
}

impl fmt::Display for StockThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TargetYear
// ---------------------------------------------------------------------------

/// A four-digit calendar year used to filter spending analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct TargetYear(i32);

impl TargetYear {
    pub fn new(year: i32) -> Result<Self> {
        if (1000..=9999).contains(&year) {
            Ok(Self(year))
        } else {
            Err(LedgerError::Configuration(format!(
                "target year must be a 4-digit calendar year, got {}",
                year
            )))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for TargetYear {
    type Error = LedgerError;

    fn try_from(year: i32) -> Result<Self> {
        Self::new(year)
    }
}

impl From<TargetYear> for i32 {
    fn from(y: TargetYear) -> i32 {
        y.0
    }
}

impl fmt::Display for TargetYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BucketMode
// ---------------------------------------------------------------------------

/// How the spending bucketizer groups purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketMode {
    /// One bucket per calendar month, labelled `"Mon YYYY"`.
    ByMonth,
    /// One bucket per observed (month, category) pair, labelled `"Mon"`.
    ByMonthAndCategory,
}

impl std::str::FromStr for BucketMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "by-month" => Ok(Self::ByMonth),
            "by-month-and-category" => Ok(Self::ByMonthAndCategory),
            other => Err(LedgerError::Configuration(format!(
                "unknown bucketing mode '{}'",
                other
            ))),
        }
    }
}
