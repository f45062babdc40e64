//! Raw row → canonical record coercion.
//!
//! Rows arrive as loosely typed field maps (the shape [`Connection::execute`]
//! returns). Each row either becomes a typed record or is rejected with a
//! reason; rejected rows are never defaulted, so they cannot skew sums.
//!
//! [`Connection::execute`]: crate::connection::Connection::execute

use crate::models::{CartRecord, ProductRecord, PurchaseRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A raw row: column name → loosely typed value.
pub type RawRecord = HashMap<String, Value>;

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    Cart,
    Purchase,
    Product,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Cart => "cart",
            RecordKind::Purchase => "purchase",
            RecordKind::Product => "product",
        })
    }
}

/// Why a raw row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRejection {
    pub kind: RecordKind,
    pub reason: String,
}

/// Normalized records plus the rows that failed coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RecordRejection>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> Normalized<T> {
    /// Number of malformed rows dropped. Non-fatal.
    pub fn dropped_count(&self) -> usize {
        self.rejected.len()
    }

    /// Append another batch, keeping both sets of rejections.
    pub fn extend(&mut self, other: Normalized<T>) {
        self.records.extend(other.records);
        self.rejected.extend(other.rejected);
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn normalize_carts(rows: &[RawRecord]) -> Normalized<CartRecord> {
    normalize_with(rows, RecordKind::Cart, |row| {
        Ok(CartRecord {
            cart_id: id_field(row, "cart_id")?,
            owner_id: id_field(row, "user_id")?,
        })
    })
}

pub fn normalize_purchases(rows: &[RawRecord]) -> Normalized<PurchaseRecord> {
    normalize_with(rows, RecordKind::Purchase, |row| {
        Ok(PurchaseRecord {
            purchase_id: id_field(row, "purchase_id")?,
            cart_id: id_field(row, "cart_id")?,
            product_id: id_field(row, "product_id")?,
            quantity: quantity_field(row, "product_quantity")?,
            unit_price: price_field(row, "product_price")?,
            category: text_field(row, "product_category")?,
            purchased_at: date_field(row, "input_date")?,
        })
    })
}

pub fn normalize_products(rows: &[RawRecord]) -> Normalized<ProductRecord> {
    normalize_with(rows, RecordKind::Product, |row| {
        Ok(ProductRecord {
            product_id: id_field(row, "product_id")?,
            name: text_field(row, "product_name")?,
            category: text_field(row, "category")?,
            unit_price: price_field(row, "unit_price")?,
        })
    })
}

fn normalize_with<T, F>(rows: &[RawRecord], kind: RecordKind, convert: F) -> Normalized<T>
where
    F: Fn(&RawRecord) -> Result<T, String>,
{
    let mut out = Normalized {
        records: Vec::with_capacity(rows.len()),
        rejected: Vec::new(),
    };
    for row in rows {
        match convert(row) {
            Ok(record) => out.records.push(record),
            Err(reason) => {
                tracing::warn!(%kind, %reason, "dropping malformed record");
                out.rejected.push(RecordRejection { kind, reason });
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

fn field<'r>(row: &'r RawRecord, name: &str) -> Result<&'r Value, String> {
    match row.get(name) {
        None | Some(Value::Null) => Err(format!("missing field '{}'", name)),
        Some(v) => Ok(v),
    }
}

/// Identifiers may be strings or integers; both render as strings.
fn id_field(row: &RawRecord, name: &str) -> Result<String, String> {
    match field(row, name)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(format!("field '{}' is not an identifier: {}", name, other)),
    }
}

fn text_field(row: &RawRecord, name: &str) -> Result<String, String> {
    match field(row, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("field '{}' is not text: {}", name, other)),
    }
}

fn number_field(row: &RawRecord, name: &str) -> Result<f64, String> {
    let parsed = match field(row, name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(format!("field '{}' is not a number", name)),
    }
}

fn quantity_field(row: &RawRecord, name: &str) -> Result<u64, String> {
    let v = number_field(row, name)?;
    if v < 0.0 || v.fract() != 0.0 || v > u64::MAX as f64 {
        return Err(format!(
            "field '{}' must be a non-negative integer, got {}",
            name, v
        ));
    }
    Ok(v as u64)
}

fn price_field(row: &RawRecord, name: &str) -> Result<f64, String> {
    let v = number_field(row, name)?;
    if v < 0.0 {
        return Err(format!("field '{}' must be non-negative, got {}", name, v));
    }
    Ok(v)
}

fn date_field(row: &RawRecord, name: &str) -> Result<NaiveDateTime, String> {
    match field(row, name)? {
        Value::String(s) => {
            parse_timestamp(s).ok_or_else(|| format!("field '{}' is not a date: '{}'", name, s))
        }
        other => Err(format!("field '{}' is not a date: {}", name, other)),
    }
}

/// Parse the timestamp shapes the ledger tables hold.
///
/// Zoned RFC 3339 values are converted to UTC before the zone is dropped.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
