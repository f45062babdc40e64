//! Async wrapper around [`GroceryLedger`] for use in Tokio runtimes.
//!
//! Ledger reads go through DuckDB and the filesystem, so every call is
//! dispatched to the blocking pool via [`tokio::task::spawn_blocking`].
//! The analytics themselves stay synchronous.
//!
//! # Example
//!
//! ```no_run
//! use grocery_ledger::{AsyncGroceryLedger, StockThreshold};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let ledger = AsyncGroceryLedger::builder().data_dir("./ledger").build().await.unwrap();
//!     let threshold = StockThreshold::new(3).unwrap();
//!     let inventory = ledger.inventory("user-1", threshold).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::{StockThreshold, TargetYear};
use crate::error::{LedgerError, Result};
use crate::models::{CategoryTotal, InventoryReport, SpendingInsights, TrendReport};
use crate::spending::SpendingView;
use crate::{Diagnosed, GroceryLedger, RawRecord, SpendingRequest};

fn join_error(e: tokio::task::JoinError) -> LedgerError {
    LedgerError::InvalidArgument(format!("Task join error: {e}"))
}

// ---------------------------------------------------------------------------
// AsyncGroceryLedgerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncGroceryLedger`].
#[derive(Default)]
pub struct AsyncGroceryLedgerBuilder {
    data_dir: Option<PathBuf>,
}

impl AsyncGroceryLedgerBuilder {
    /// Set the directory holding the ledger's NDJSON tables.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the async ledger on the blocking pool.
    pub async fn build(self) -> Result<AsyncGroceryLedger> {
        tokio::task::spawn_blocking(move || {
            let mut builder = GroceryLedger::builder();
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            let ledger = builder.build()?;
            Ok(AsyncGroceryLedger {
                inner: Arc::new(Mutex::new(ledger)),
            })
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncGroceryLedger
// ---------------------------------------------------------------------------

/// Async wrapper around [`GroceryLedger`].
///
/// The ledger is guarded by a [`Mutex`] since its connection uses `RefCell`
/// internally.
#[derive(Clone)]
pub struct AsyncGroceryLedger {
    inner: Arc<Mutex<GroceryLedger>>,
}

impl AsyncGroceryLedger {
    pub fn builder() -> AsyncGroceryLedgerBuilder {
        AsyncGroceryLedgerBuilder::default()
    }

    /// Run a sync ledger operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&GroceryLedger) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = ledger
                .lock()
                .map_err(|_| LedgerError::InvalidArgument("ledger lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(join_error)?
    }

    pub async fn inventory(
        &self,
        owner_id: &str,
        threshold: StockThreshold,
    ) -> Result<Diagnosed<InventoryReport>> {
        let owner_id = owner_id.to_string();
        self.run(move |l| l.inventory(&owner_id, threshold)).await
    }

    pub async fn ingredients(
        &self,
        owner_id: &str,
        threshold: StockThreshold,
    ) -> Result<Vec<String>> {
        let owner_id = owner_id.to_string();
        self.run(move |l| l.ingredients(&owner_id, threshold)).await
    }

    pub async fn spending(&self, request: SpendingRequest) -> Result<Diagnosed<SpendingView>> {
        self.run(move |l| l.spending(&request)).await
    }

    pub async fn trends(&self, owner_id: Option<String>) -> Result<Diagnosed<TrendReport>> {
        self.run(move |l| l.trends(owner_id.as_deref())).await
    }

    pub async fn category_totals(
        &self,
        owner_id: Option<String>,
        year: Option<TargetYear>,
    ) -> Result<Diagnosed<Vec<CategoryTotal>>> {
        self.run(move |l| l.category_totals(owner_id.as_deref(), year)).await
    }

    pub async fn insights(
        &self,
        owner_id: Option<String>,
        year: Option<TargetYear>,
    ) -> Result<Diagnosed<SpendingInsights>> {
        self.run(move |l| l.insights(owner_id.as_deref(), year)).await
    }

    pub async fn cart_total(&self, cart_id: &str) -> Result<Diagnosed<f64>> {
        let cart_id = cart_id.to_string();
        self.run(move |l| l.cart_total(&cart_id)).await
    }

    /// Execute a raw SQL query asynchronously.
    pub async fn sql(&self, query: &str, params: &[String]) -> Result<Vec<RawRecord>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |l| l.sql(&query, &params)).await
    }

    /// Forget loaded tables so the next query re-reads the files on disk.
    pub async fn reload(&self) -> Result<()> {
        self.run(|l| {
            l.reload();
            Ok(())
        })
        .await
    }
}
