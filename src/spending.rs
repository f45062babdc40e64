//! Calendar-bucketed spending aggregation.
//!
//! Buckets are keyed by [`MonthKey`], so ordering always follows the calendar
//! no matter what order purchases arrive in. Output is sparse: a month with no
//! purchases produces no bucket unless [`fill_missing_months`] is applied.

use crate::config::{BucketMode, TargetYear};
use crate::models::{CategoryTotal, MonthKey, PurchaseRecord, SpendingBucket, SpendingInsights};
use crate::palette::{assign_colors, CategoryColors};
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

fn in_year(purchase: &PurchaseRecord, year: Option<TargetYear>) -> bool {
    year.map_or(true, |y| purchase.purchased_at.year() == y.get())
}

fn label(month: MonthKey, mode: BucketMode) -> String {
    match mode {
        BucketMode::ByMonth => month.long_label(),
        BucketMode::ByMonthAndCategory => month.short_label().to_string(),
    }
}

/// Assigns each category a rank by first appearance.
#[derive(Default)]
struct FirstSeen<'a> {
    rank: HashMap<&'a str, usize>,
    order: Vec<&'a str>,
}

impl<'a> FirstSeen<'a> {
    fn rank_of(&mut self, category: &'a str) -> usize {
        if let Some(&r) = self.rank.get(category) {
            return r;
        }
        let r = self.order.len();
        self.rank.insert(category, r);
        self.order.push(category);
        r
    }
}

/// Group purchases into spending buckets.
///
/// Each included purchase contributes its line total to exactly one bucket.
/// In [`BucketMode::ByMonthAndCategory`] buckets are ordered by month, then by
/// the category's first appearance in the (filtered) input.
pub fn bucketize(
    purchases: &[PurchaseRecord],
    mode: BucketMode,
    year: Option<TargetYear>,
) -> Vec<SpendingBucket> {
    let filtered = purchases.iter().filter(|p| in_year(p, year));

    match mode {
        BucketMode::ByMonth => {
            let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
            for p in filtered {
                *totals.entry(MonthKey::of(&p.purchased_at)).or_insert(0.0) += p.line_total();
            }
            totals
                .into_iter()
                .map(|(month, total_spent)| SpendingBucket {
                    month,
                    month_key: label(month, mode),
                    category: None,
                    total_spent,
                })
                .collect()
        }
        BucketMode::ByMonthAndCategory => {
            let mut seen = FirstSeen::default();
            let mut totals: BTreeMap<(MonthKey, usize), f64> = BTreeMap::new();
            for p in filtered {
                let rank = seen.rank_of(&p.category);
                *totals
                    .entry((MonthKey::of(&p.purchased_at), rank))
                    .or_insert(0.0) += p.line_total();
            }
            totals
                .into_iter()
                .map(|((month, rank), total_spent)| SpendingBucket {
                    month,
                    month_key: label(month, mode),
                    category: Some(seen.order[rank].to_string()),
                    total_spent,
                })
                .collect()
        }
    }
}

/// De-duplicated category names in the order they first appear in `buckets`.
pub fn categories(buckets: &[SpendingBucket]) -> Vec<String> {
    let mut seen = FirstSeen::default();
    for b in buckets {
        if let Some(c) = &b.category {
            seen.rank_of(c);
        }
    }
    seen.order.into_iter().map(str::to_string).collect()
}

/// Zero-fill gaps in a by-month series so the axis is continuous from the
/// first to the last month present.
///
/// Category buckets are folded to one total per month first. Every output
/// bucket carries the `"Mon YYYY"` label.
pub fn fill_missing_months(series: &[SpendingBucket]) -> Vec<SpendingBucket> {
    let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for b in series {
        *totals.entry(b.month).or_insert(0.0) += b.total_spent;
    }

    let (first, last) = match (totals.keys().next(), totals.keys().next_back()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return Vec::new(),
    };

    let mut out = Vec::new();
    let mut month = first;
    while month <= last {
        out.push(SpendingBucket {
            month,
            month_key: month.long_label(),
            category: None,
            total_spent: totals.get(&month).copied().unwrap_or(0.0),
        });
        month = month.next();
    }
    out
}

/// Whole-period spend per category, in first-seen order.
pub fn category_totals(purchases: &[PurchaseRecord], year: Option<TargetYear>) -> Vec<CategoryTotal> {
    let mut seen = FirstSeen::default();
    let mut totals: Vec<f64> = Vec::new();
    for p in purchases.iter().filter(|p| in_year(p, year)) {
        let rank = seen.rank_of(&p.category);
        if rank == totals.len() {
            totals.push(0.0);
        }
        totals[rank] += p.line_total();
    }
    seen.order
        .into_iter()
        .zip(totals)
        .map(|(category, total_spent)| CategoryTotal {
            category: category.to_string(),
            total_spent,
        })
        .collect()
}

/// Total for a single cart, rounded to cents.
pub fn cart_total(purchases: &[PurchaseRecord], cart_id: &str) -> f64 {
    let total: f64 = purchases
        .iter()
        .filter(|p| p.cart_id == cart_id)
        .map(PurchaseRecord::line_total)
        .sum();
    (total * 100.0).round() / 100.0
}

/// Total spend and the category with the highest spend (earliest seen wins
/// ties).
pub fn insights(purchases: &[PurchaseRecord], year: Option<TargetYear>) -> SpendingInsights {
    let by_category = category_totals(purchases, year);
    let total_spent = by_category.iter().map(|c| c.total_spent).sum();
    let top_category = by_category.into_iter().fold(None, |best: Option<CategoryTotal>, c| {
        match best {
            Some(b) if b.total_spent >= c.total_spent => Some(b),
            _ => Some(c),
        }
    });
    SpendingInsights {
        total_spent,
        top_category,
    }
}

// ---------------------------------------------------------------------------
// SpendingView
// ---------------------------------------------------------------------------

/// Buckets plus the category colors a chart needs to draw them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingView {
    pub buckets: Vec<SpendingBucket>,
    pub categories: Vec<String>,
    pub colors: CategoryColors,
}

/// Bucketize, then color the categories in first-seen bucket order.
pub fn view(purchases: &[PurchaseRecord], mode: BucketMode, year: Option<TargetYear>) -> SpendingView {
    let buckets = bucketize(purchases, mode, year);
    let categories = categories(&buckets);
    let colors = assign_colors(&categories);
    SpendingView {
        buckets,
        categories,
        colors,
    }
}
