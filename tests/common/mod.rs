//! Shared test fixtures for the grocery ledger integration tests.
//!
//! Provides `setup_sample_ledger()`, which writes small carts / purchases /
//! products NDJSON tables into a temp directory and opens a ledger over them,
//! plus record constructors for the pure analytics tests.

#![allow(dead_code)]

use grocery_ledger::models::{CartRecord, ProductRecord, PurchaseRecord};
use grocery_ledger::normalize::parse_timestamp;
use grocery_ledger::{DataDir, GroceryLedger};

/// Open a ledger over a temp directory holding the sample tables.
///
/// Returns `(GroceryLedger, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test.
///
/// Sample ledger:
/// - `user-1` owns carts `c1`, `c2`; `user-2` owns `c3`; `user-3` owns `c4`
///   (which has no purchases).
/// - `c2` holds a purchase of `p9`, which is not in the catalog.
/// - `c1` holds two malformed purchases (null quantity, unparseable date).
pub fn setup_sample_ledger() -> (GroceryLedger, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    write_sample_tables(&DataDir::new(Some(tmp_dir.path().to_path_buf())).unwrap());
    let ledger = GroceryLedger::builder()
        .data_dir(tmp_dir.path())
        .build()
        .unwrap();
    (ledger, tmp_dir)
}

/// Open a ledger over an empty temp directory.
pub fn setup_empty_ledger() -> (GroceryLedger, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let ledger = GroceryLedger::builder()
        .data_dir(tmp_dir.path())
        .build()
        .unwrap();
    (ledger, tmp_dir)
}

pub fn write_sample_tables(dir: &DataDir) {
    // -- carts ----------------------------------------------------------------
    let carts = vec![
        serde_json::json!({"cart_id": "c1", "user_id": "user-1", "cart_name": "Weekly"}),
        serde_json::json!({"cart_id": "c2", "user_id": "user-1", "cart_name": "Party"}),
        serde_json::json!({"cart_id": "c3", "user_id": "user-2", "cart_name": "Weekly"}),
        serde_json::json!({"cart_id": "c4", "user_id": "user-3", "cart_name": "Empty"}),
    ];
    dir.write_table("carts", &carts).unwrap();

    // -- products -------------------------------------------------------------
    let products = vec![
        serde_json::json!({"product_id": "p1", "product_name": "Milk", "category": "Dairy", "unit_price": 3.5}),
        serde_json::json!({"product_id": "p2", "product_name": "Bread", "category": "Bakery", "unit_price": 2.0}),
        serde_json::json!({"product_id": "p3", "product_name": "Apples", "category": "Produce", "unit_price": 1.25}),
    ];
    dir.write_table("products", &products).unwrap();

    // -- purchases ------------------------------------------------------------
    let purchases = vec![
        purchase_row("pu1", "c1", "p1", serde_json::json!(2), 3.0, "Dairy", "2024-01-05T10:00:00"),
        purchase_row("pu2", "c1", "p2", serde_json::json!(1), 2.0, "Bakery", "2024-01-20T09:30:00"),
        purchase_row("pu3", "c2", "p1", serde_json::json!(3), 3.5, "Dairy", "2024-02-11T12:00:00"),
        purchase_row("pu4", "c2", "p9", serde_json::json!(4), 5.0, "Snacks", "2024-02-12T12:00:00"),
        purchase_row("pu5", "c3", "p3", serde_json::json!(6), 1.25, "Produce", "2023-02-01T08:00:00"),
        purchase_row("pu6", "c2", "p3", serde_json::json!(0), 1.25, "Produce", "2024-03-02T08:00:00"),
        purchase_row("pu7", "c1", "p2", serde_json::Value::Null, 2.0, "Bakery", "2024-03-03T08:00:00"),
        purchase_row("pu8", "c1", "p1", serde_json::json!(1), 3.5, "Dairy", "sometime last week"),
    ];
    dir.write_table("purchases", &purchases).unwrap();
}

fn purchase_row(
    purchase_id: &str,
    cart_id: &str,
    product_id: &str,
    quantity: serde_json::Value,
    price: f64,
    category: &str,
    date: &str,
) -> serde_json::Value {
    serde_json::json!({
        "purchase_id": purchase_id,
        "cart_id": cart_id,
        "product_id": product_id,
        "product_quantity": quantity,
        "product_price": price,
        "product_category": category,
        "input_date": date,
    })
}

// ---------------------------------------------------------------------------
// In-memory record constructors
// ---------------------------------------------------------------------------

pub fn cart(cart_id: &str, owner_id: &str) -> CartRecord {
    CartRecord {
        cart_id: cart_id.to_string(),
        owner_id: owner_id.to_string(),
    }
}

pub fn product(product_id: &str, name: &str, category: &str, unit_price: f64) -> ProductRecord {
    ProductRecord {
        product_id: product_id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        unit_price,
    }
}

/// A purchase line; `date` accepts any shape `parse_timestamp` does.
pub fn purchase(
    purchase_id: &str,
    cart_id: &str,
    product_id: &str,
    quantity: u64,
    unit_price: f64,
    category: &str,
    date: &str,
) -> PurchaseRecord {
    PurchaseRecord {
        purchase_id: purchase_id.to_string(),
        cart_id: cart_id.to_string(),
        product_id: product_id.to_string(),
        quantity,
        unit_price,
        category: category.to_string(),
        purchased_at: parse_timestamp(date).unwrap(),
    }
}

/// A purchase with only the fields the spending analytics read.
pub fn spend(quantity: u64, unit_price: f64, category: &str, date: &str) -> PurchaseRecord {
    purchase("x", "c", "p", quantity, unit_price, category, date)
}
