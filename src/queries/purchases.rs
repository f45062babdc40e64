//! Purchase line queries against the `purchases` ledger table.

use crate::error::Result;
use crate::models::PurchaseRecord;
use crate::normalize::{normalize_purchases, Normalized};
use crate::sql_builder::SqlBuilder;

/// Query interface for purchase lines.
pub struct PurchaseQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> PurchaseQuery<'a> {
    /// Create a new `PurchaseQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// Purchases belonging to any of the given carts, oldest first.
    ///
    /// An empty id set matches nothing and skips the database entirely.
    pub fn by_cart_ids(&self, cart_ids: &[&str]) -> Result<Normalized<PurchaseRecord>> {
        if cart_ids.is_empty() {
            return Ok(Normalized::default());
        }
        self.conn.ensure_tables(&["purchases"])?;

        let (sql, params) = SqlBuilder::new("purchases")
            .where_in("CAST(cart_id AS VARCHAR)", cart_ids)
            .order_by(&["input_date ASC", "purchase_id ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        tracing::debug!(carts = cart_ids.len(), rows = rows.len(), "fetched purchases by cart");
        Ok(normalize_purchases(&rows))
    }

    /// Purchases in a single cart.
    pub fn by_cart(&self, cart_id: &str) -> Result<Normalized<PurchaseRecord>> {
        self.by_cart_ids(&[cart_id])
    }

    /// Every purchase in the ledger.
    ///
    /// Year filtering happens in the bucketizer, after normalization, so rows
    /// with unparseable dates are counted as dropped rather than filtered out.
    pub fn all(&self) -> Result<Normalized<PurchaseRecord>> {
        self.conn.ensure_tables(&["purchases"])?;

        let (sql, params) = SqlBuilder::new("purchases")
            .order_by(&["input_date ASC", "purchase_id ASC"])
            .build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(normalize_purchases(&rows))
    }
}
