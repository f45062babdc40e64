//! Cart ownership queries against the `carts` ledger table.

use crate::error::Result;
use crate::models::CartRecord;
use crate::normalize::{normalize_carts, Normalized};
use crate::sql_builder::SqlBuilder;

/// Query interface for carts.
pub struct CartQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> CartQuery<'a> {
    /// Create a new `CartQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// All carts belonging to `owner_id`. Unknown owners yield an empty set.
    pub fn by_owner(&self, owner_id: &str) -> Result<Normalized<CartRecord>> {
        self.conn.ensure_tables(&["carts"])?;

        let (sql, params) = SqlBuilder::new("carts")
            .where_eq("CAST(user_id AS VARCHAR)", owner_id)
            .order_by(&["cart_id ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        tracing::debug!(owner_id, rows = rows.len(), "fetched carts by owner");
        Ok(normalize_carts(&rows))
    }

    /// A single cart by id.
    pub fn get(&self, cart_id: &str) -> Result<Option<CartRecord>> {
        self.conn.ensure_tables(&["carts"])?;

        let (sql, params) = SqlBuilder::new("carts")
            .where_eq("CAST(cart_id AS VARCHAR)", cart_id)
            .limit(1)
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(normalize_carts(&rows).records.into_iter().next())
    }

    /// Every cart in the ledger.
    pub fn all(&self) -> Result<Normalized<CartRecord>> {
        self.conn.ensure_tables(&["carts"])?;

        let (sql, params) = SqlBuilder::new("carts").order_by(&["cart_id ASC"]).build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(normalize_carts(&rows))
    }
}
