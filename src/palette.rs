//! Deterministic color assignment for category series.

use serde::Serialize;

pub const PALETTE: [&str; 9] = [
    "#FF6384", // red
    "#36A2EB", // blue
    "#FFCE56", // yellow
    "#4BC0C0", // teal
    "#9966FF", // purple
    "#FF9F40", // orange
    "#8B0000", // dark red
    "#4682B4", // steel blue
    "#FFD700", // gold
];

/// Category → color pairs, in the order the categories were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryColors(Vec<(String, &'static str)>);

impl CategoryColors {
    pub fn get(&self, category: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, color)| *color)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.0.iter().map(|(name, color)| (name.as_str(), *color))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Assign each category the palette entry at its index, wrapping around.
///
/// `categories` is expected to be de-duplicated (see
/// [`spending::categories`](crate::spending::categories)).
pub fn assign_colors(categories: &[String]) -> CategoryColors {
    CategoryColors(
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), PALETTE[i % PALETTE.len()]))
            .collect(),
    )
}
