//! Product catalog queries against the `products` ledger table.

use crate::error::Result;
use crate::models::ProductRecord;
use crate::normalize::{normalize_products, Normalized};
use crate::sql_builder::{escape_like, SqlBuilder};

// ---------------------------------------------------------------------------
// SearchProductsParams
// ---------------------------------------------------------------------------

/// Parameters for the product search method.
#[derive(Debug, Clone, Default)]
pub struct SearchProductsParams {
    /// Case-insensitive substring matched against name or category.
    pub text: Option<String>,
    /// Case-insensitive exact category match.
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ---------------------------------------------------------------------------
// ProductQuery
// ---------------------------------------------------------------------------

/// Query interface for the product catalog.
pub struct ProductQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> ProductQuery<'a> {
    /// Create a new `ProductQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// Catalog entries for the given product ids. Ids with no entry are
    /// simply absent from the result.
    pub fn by_ids(&self, product_ids: &[&str]) -> Result<Normalized<ProductRecord>> {
        if product_ids.is_empty() {
            return Ok(Normalized::default());
        }
        self.conn.ensure_tables(&["products"])?;

        let (sql, params) = SqlBuilder::new("products")
            .where_in("CAST(product_id AS VARCHAR)", product_ids)
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        tracing::debug!(requested = product_ids.len(), rows = rows.len(), "fetched products by id");
        Ok(normalize_products(&rows))
    }

    /// A single product by id.
    pub fn get(&self, product_id: &str) -> Result<Option<ProductRecord>> {
        Ok(self.by_ids(&[product_id])?.records.into_iter().next())
    }

    /// Search the catalog, ordered by product name.
    pub fn search(&self, params: &SearchProductsParams) -> Result<Normalized<ProductRecord>> {
        self.conn.ensure_tables(&["products"])?;

        let mut qb = SqlBuilder::new("products");
        qb.order_by(&["product_name ASC"]);

        // Search text is matched literally, wildcards included.
        let pattern = params.text.as_ref().map(|t| format!("%{}%", escape_like(t)));
        if let Some(ref p) = pattern {
            qb.where_or(&[
                ("LOWER(product_name) LIKE LOWER(?) ESCAPE '\\'", p.as_str()),
                ("LOWER(category) LIKE LOWER(?) ESCAPE '\\'", p.as_str()),
            ]);
        }

        if let Some(ref category) = params.category {
            qb.where_clause("LOWER(category) = LOWER(?)", &[category.as_str()]);
        }

        if let Some(l) = params.limit {
            qb.limit(l);
        }
        if let Some(o) = params.offset {
            qb.offset(o);
        }

        let (sql, bind) = qb.build();
        let rows = self.conn.execute(&sql, &bind)?;
        Ok(normalize_products(&rows))
    }

    /// The whole catalog, ordered by product name.
    pub fn all(&self) -> Result<Normalized<ProductRecord>> {
        self.search(&SearchProductsParams::default())
    }
}
