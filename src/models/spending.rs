use crate::error::LedgerError;
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ---------------------------------------------------------------------------
// MonthKey: Calendar month, ordered chronologically
// ---------------------------------------------------------------------------

/// A calendar month. Field order makes the derived `Ord` chronological.
///
/// The month is always in `1..=12`; deserialization enforces the same check
/// as [`MonthKey::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawMonthKey")]
pub struct MonthKey {
    year: i32,
    /// 1-based month number.
    month: u32,
}

#[derive(Deserialize)]
struct RawMonthKey {
    year: i32,
    month: u32,
}

impl TryFrom<RawMonthKey> for MonthKey {
    type Error = LedgerError;

    fn try_from(raw: RawMonthKey) -> Result<Self, LedgerError> {
        MonthKey::new(raw.year, raw.month).ok_or_else(|| {
            LedgerError::InvalidArgument(format!("month must be in 1..=12, got {}", raw.month))
        })
    }
}

impl MonthKey {
    /// Returns `None` if `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// Three-letter month abbreviation, e.g. `"Jan"`.
    pub fn short_label(&self) -> &'static str {
        MONTH_ABBREVIATIONS[(self.month - 1) as usize]
    }

    /// Month and year, e.g. `"Jan 2024"`.
    pub fn long_label(&self) -> String {
        format!("{} {}", self.short_label(), self.year)
    }

    /// Months since year 0, for gap arithmetic.
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    /// Shift by a signed number of months.
    pub fn offset(&self, months: i64) -> Self {
        Self::from_ordinal(self.ordinal() + months)
    }

    pub fn next(&self) -> Self {
        self.offset(1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.short_label(), self.year)
    }
}

// ---------------------------------------------------------------------------
// SpendingBucket: One aggregation cell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingBucket {
    pub month: MonthKey,
    /// Display label: `"Mon YYYY"` in by-month mode, `"Mon"` in
    /// by-month-and-category mode.
    pub month_key: String,
    pub category: Option<String>,
    pub total_spent: f64,
}

// ---------------------------------------------------------------------------
// CategoryTotal: Whole-period spend for one category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total_spent: f64,
}

// ---------------------------------------------------------------------------
// SpendingInsights: Dashboard headline numbers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingInsights {
    pub total_spent: f64,
    pub top_category: Option<CategoryTotal>,
}
