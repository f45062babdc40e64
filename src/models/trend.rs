use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ComparisonKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonKind {
    PriorMonth,
    YearOverYear,
    TrailingThreeMonth,
}

impl ComparisonKind {
    fn phrase(&self) -> &'static str {
        match self {
            ComparisonKind::PriorMonth => "compared to last month",
            ComparisonKind::YearOverYear => "year over year",
            ComparisonKind::TrailingThreeMonth => "over last 3 months",
        }
    }
}

// ---------------------------------------------------------------------------
// TrendMetric: One period-over-period comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetric {
    pub comparison_kind: ComparisonKind,
    pub current_value: f64,
    pub baseline_value: Option<f64>,
    /// `None` whenever the baseline is missing or zero.
    pub percent_change: Option<f64>,
}

impl TrendMetric {
    /// True when spending went up (or stayed flat) relative to the baseline.
    pub fn is_increase(&self) -> Option<bool> {
        self.percent_change.map(|p| p >= 0.0)
    }
}

/// Renders the comparison chip text, e.g.
/// `"50.00% increase compared to last month"`.
impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent_change {
            Some(p) => {
                let direction = if p >= 0.0 { "increase" } else { "decrease" };
                write!(
                    f,
                    "{:.2}% {} {}",
                    p.abs(),
                    direction,
                    self.comparison_kind.phrase()
                )
            }
            None => write!(f, "not enough data {}", self.comparison_kind.phrase()),
        }
    }
}

// ---------------------------------------------------------------------------
// TrendReport: All three comparisons over one monthly series
// ---------------------------------------------------------------------------

/// Each metric is `None` when the series has no usable baseline for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub prior_month: Option<TrendMetric>,
    pub year_over_year: Option<TrendMetric>,
    pub trailing_three_month: Option<TrendMetric>,
}

impl TrendReport {
    pub fn metrics(&self) -> impl Iterator<Item = &TrendMetric> {
        [
            self.prior_month.as_ref(),
            self.year_over_year.as_ref(),
            self.trailing_three_month.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}
