//! Period-over-period spending comparisons.
//!
//! All three comparisons read the same monthly series independently; a missing
//! baseline yields `None` rather than an error.

use crate::models::{ComparisonKind, MonthKey, SpendingBucket, TrendMetric, TrendReport};
use std::collections::BTreeMap;

/// `(current - baseline) / baseline * 100`, or `None` for a zero baseline.
pub fn percent_change(current: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    let change = (current - baseline) / baseline * 100.0;
    change.is_finite().then_some(change)
}

fn metric(kind: ComparisonKind, current: f64, baseline: f64) -> TrendMetric {
    TrendMetric {
        comparison_kind: kind,
        current_value: current,
        baseline_value: Some(baseline),
        percent_change: percent_change(current, baseline),
    }
}

/// Compare the latest month of a by-month series against its baselines.
///
/// Buckets sharing a month (category buckets) are summed first, so the input
/// may come from either bucketing mode.
pub fn compare(series: &[SpendingBucket]) -> TrendReport {
    let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for b in series {
        *totals.entry(b.month).or_insert(0.0) += b.total_spent;
    }
    let months: Vec<(MonthKey, f64)> = totals.into_iter().collect();

    let Some(&(last_month, current)) = months.last() else {
        return TrendReport::default();
    };
    let prior = &months[..months.len() - 1];

    let prior_month = prior
        .last()
        .map(|&(_, baseline)| metric(ComparisonKind::PriorMonth, current, baseline));

    let year_ago = last_month.offset(-12);
    let year_over_year = prior
        .iter()
        .find(|(month, _)| *month == year_ago)
        .map(|&(_, baseline)| metric(ComparisonKind::YearOverYear, current, baseline));

    let window = &prior[prior.len().saturating_sub(3)..];
    let trailing_three_month = (!window.is_empty()).then(|| {
        let mean = window.iter().map(|(_, v)| v).sum::<f64>() / window.len() as f64;
        metric(ComparisonKind::TrailingThreeMonth, current, mean)
    });

    TrendReport {
        prior_month,
        year_over_year,
        trailing_three_month,
    }
}
