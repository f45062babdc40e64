//! Datastore query modules.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and returns rows already run
//! through the [`normalize`](crate::normalize) layer, so malformed rows are
//! reported rather than returned.

pub mod carts;
pub mod products;
pub mod purchases;

pub use carts::CartQuery;
pub use products::{ProductQuery, SearchProductsParams};
pub use purchases::PurchaseQuery;
