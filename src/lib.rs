//! Grocery ledger analytics for Rust.
//!
//! Derives a per-owner inventory (with stock classification) and spending
//! analytics (monthly/category buckets and period-over-period trends) from raw
//! purchase ledgers. Ledger tables are NDJSON files loaded into an in-memory
//! DuckDB database; the analytics themselves are pure functions in
//! [`inventory`], [`stock`], [`spending`], [`trends`] and [`palette`] that can
//! be called directly on in-memory records.
//!
//! # Quick start
//!
//! ```no_run
//! use grocery_ledger::{BucketMode, GroceryLedger, SpendingRequest, StockThreshold};
//!
//! let ledger = GroceryLedger::builder().data_dir("./ledger").build().unwrap();
//!
//! let inventory = ledger.inventory("user-1", StockThreshold::new(3).unwrap()).unwrap();
//! let spending = ledger
//!     .spending(&SpendingRequest::new(BucketMode::ByMonth).owner("user-1"))
//!     .unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod data_dir;
pub mod error;
pub mod inventory;
pub mod models;
pub mod normalize;
pub mod palette;
pub mod queries;
pub mod spending;
pub mod sql_builder;
pub mod stock;
pub mod trends;

#[cfg(feature = "async")]
pub use async_client::AsyncGroceryLedger;
pub use config::{BucketMode, StockThreshold, TargetYear};
pub use connection::Connection;
pub use data_dir::DataDir;
pub use error::{LedgerError, Result};
pub use normalize::{Normalized, RawRecord};
pub use sql_builder::SqlBuilder;

use models::{CategoryTotal, InventoryReport, PurchaseRecord, SpendingInsights, TrendReport};
use spending::SpendingView;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// GroceryLedgerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`GroceryLedger`] instance.
#[derive(Default)]
pub struct GroceryLedgerBuilder {
    data_dir: Option<PathBuf>,
}

impl GroceryLedgerBuilder {
    /// Set the directory holding the ledger's NDJSON tables.
    ///
    /// If not set, the platform data directory is used
    /// (e.g. `~/.local/share/grocery-ledger` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the ledger. Tables are loaded lazily on first query.
    pub fn build(self) -> Result<GroceryLedger> {
        let dir = DataDir::new(self.data_dir)?;
        let conn = Connection::new(dir)?;
        Ok(GroceryLedger { conn })
    }
}

// ---------------------------------------------------------------------------
// Diagnosed
// ---------------------------------------------------------------------------

/// An analytics result together with the number of malformed ledger rows
/// that were dropped while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosed<T> {
    pub value: T,
    pub dropped_records: usize,
}

// ---------------------------------------------------------------------------
// SpendingRequest
// ---------------------------------------------------------------------------

/// What slice of the ledger to bucketize, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendingRequest {
    /// Restrict to purchases in this owner's carts. `None` means the whole ledger.
    pub owner_id: Option<String>,
    pub mode: BucketMode,
    pub year: Option<TargetYear>,
}

impl SpendingRequest {
    pub fn new(mode: BucketMode) -> Self {
        Self {
            owner_id: None,
            mode,
            year: None,
        }
    }

    pub fn owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn year(mut self, year: TargetYear) -> Self {
        self.year = Some(year);
        self
    }
}

// ---------------------------------------------------------------------------
// GroceryLedger
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Wraps a [`Connection`] (which owns the [`DataDir`] and DuckDB database),
/// exposes the per-table query interfaces as lightweight borrowing wrappers,
/// and wires fetched records into the analytics functions.
///
/// Created via [`GroceryLedger::builder()`].
pub struct GroceryLedger {
    conn: Connection,
}

impl GroceryLedger {
    /// Create a new builder for configuring the ledger.
    pub fn builder() -> GroceryLedgerBuilder {
        GroceryLedgerBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the cart query interface.
    pub fn carts(&self) -> queries::CartQuery<'_> {
        queries::CartQuery::new(&self.conn)
    }

    /// Access the purchase query interface.
    pub fn purchases(&self) -> queries::PurchaseQuery<'_> {
        queries::PurchaseQuery::new(&self.conn)
    }

    /// Access the product catalog query interface.
    pub fn products(&self) -> queries::ProductQuery<'_> {
        queries::ProductQuery::new(&self.conn)
    }

    // -- Analytics ---------------------------------------------------------

    /// Inventory for one owner.
    ///
    /// Fetches the owner's carts, the purchases in those carts and the
    /// catalog entries they reference, then runs
    /// [`inventory::aggregate_inventory`].
    pub fn inventory(
        &self,
        owner_id: &str,
        threshold: StockThreshold,
    ) -> Result<Diagnosed<InventoryReport>> {
        let carts = self.carts().by_owner(owner_id)?;
        let cart_ids: Vec<&str> = carts.records.iter().map(|c| c.cart_id.as_str()).collect();
        let purchases = self.purchases().by_cart_ids(&cart_ids)?;

        let mut product_ids: Vec<&str> = purchases
            .records
            .iter()
            .map(|p| p.product_id.as_str())
            .collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        let products = self.products().by_ids(&product_ids)?;

        let report = inventory::aggregate_inventory(
            owner_id,
            &carts.records,
            &purchases.records,
            &products.records,
            threshold,
        );

        Ok(Diagnosed {
            value: report,
            dropped_records: carts.dropped_count()
                + purchases.dropped_count()
                + products.dropped_count(),
        })
    }

    /// Names of the owner's in-stock products, for recipe lookups.
    pub fn ingredients(&self, owner_id: &str, threshold: StockThreshold) -> Result<Vec<String>> {
        let report = self.inventory(owner_id, threshold)?;
        Ok(inventory::ingredient_names(&report.value.items))
    }

    /// Spending buckets and category colors.
    pub fn spending(&self, request: &SpendingRequest) -> Result<Diagnosed<SpendingView>> {
        let purchases = self.scoped_purchases(request.owner_id.as_deref())?;
        Ok(Diagnosed {
            value: spending::view(&purchases.records, request.mode, request.year),
            dropped_records: purchases.dropped_count(),
        })
    }

    /// Month-over-month, year-over-year and trailing-average comparisons over
    /// the full by-month history.
    pub fn trends(&self, owner_id: Option<&str>) -> Result<Diagnosed<TrendReport>> {
        let purchases = self.scoped_purchases(owner_id)?;
        let series = spending::bucketize(&purchases.records, BucketMode::ByMonth, None);
        Ok(Diagnosed {
            value: trends::compare(&series),
            dropped_records: purchases.dropped_count(),
        })
    }

    /// Whole-period spend per category.
    pub fn category_totals(
        &self,
        owner_id: Option<&str>,
        year: Option<TargetYear>,
    ) -> Result<Diagnosed<Vec<CategoryTotal>>> {
        let purchases = self.scoped_purchases(owner_id)?;
        Ok(Diagnosed {
            value: spending::category_totals(&purchases.records, year),
            dropped_records: purchases.dropped_count(),
        })
    }

    /// Total spend and top category.
    pub fn insights(
        &self,
        owner_id: Option<&str>,
        year: Option<TargetYear>,
    ) -> Result<Diagnosed<SpendingInsights>> {
        let purchases = self.scoped_purchases(owner_id)?;
        Ok(Diagnosed {
            value: spending::insights(&purchases.records, year),
            dropped_records: purchases.dropped_count(),
        })
    }

    /// Total of one cart, rounded to cents.
    pub fn cart_total(&self, cart_id: &str) -> Result<Diagnosed<f64>> {
        let purchases = self.purchases().by_cart(cart_id)?;
        Ok(Diagnosed {
            value: spending::cart_total(&purchases.records, cart_id),
            dropped_records: purchases.dropped_count(),
        })
    }

    fn scoped_purchases(&self, owner_id: Option<&str>) -> Result<Normalized<PurchaseRecord>> {
        match owner_id {
            None => self.purchases().all(),
            Some(owner) => {
                let carts = self.carts().by_owner(owner)?;
                let cart_ids: Vec<&str> =
                    carts.records.iter().map(|c| c.cart_id.as_str()).collect();
                let mut purchases = self.purchases().by_cart_ids(&cart_ids)?;
                purchases.rejected.extend(carts.rejected);
                Ok(purchases)
            }
        }
    }

    // -- Metadata and utility methods --------------------------------------

    /// Return the list of currently registered ledger tables.
    pub fn tables(&self) -> Vec<String> {
        self.conn.tables()
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// Tables must already be registered (any query accessor registers the
    /// tables it reads).
    pub fn sql(&self, query: &str, params: &[String]) -> Result<Vec<RawRecord>> {
        self.conn.execute(query, params)
    }

    /// Forget loaded tables so the next query re-reads the files on disk.
    pub fn reload(&self) {
        self.conn.reset_tables();
        tracing::debug!("ledger tables will be reloaded on next access");
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for GroceryLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self.conn.data_dir.borrow();
        write!(
            f,
            "GroceryLedger(data_dir={}, tables=[{}])",
            dir.path().display(),
            self.conn.tables().join(", ")
        )
    }
}
