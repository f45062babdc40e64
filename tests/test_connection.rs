//! Connection integration tests: raw SQL execution, table registration, etc.

mod common;

use grocery_ledger::{Connection, DataDir, LedgerError};
use std::io::Write;
use tempfile::NamedTempFile;

fn empty_connection() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let dir = DataDir::new(Some(tmp_dir.path().to_path_buf())).unwrap();
    (Connection::new(dir).unwrap(), tmp_dir)
}

fn sample_connection() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let dir = DataDir::new(Some(tmp_dir.path().to_path_buf())).unwrap();
    common::write_sample_tables(&dir);
    let conn = Connection::new(dir).unwrap();
    conn.ensure_tables(&["carts", "purchases", "products"]).unwrap();
    (conn, tmp_dir)
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_returns_correct_rows() {
    let (conn, _tmp) = sample_connection();

    let rows = conn
        .execute("SELECT * FROM carts ORDER BY cart_id", &[])
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["cart_id"], "c1");
    assert_eq!(rows[0]["user_id"], "user-1");
    assert_eq!(rows[3]["cart_id"], "c4");
}

#[test]
fn execute_with_params() {
    let (conn, _tmp) = sample_connection();

    let rows = conn
        .execute(
            "SELECT * FROM carts WHERE user_id = ?",
            &["user-1".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn execute_returns_empty_for_no_matches() {
    let (conn, _tmp) = sample_connection();

    let rows = conn
        .execute(
            "SELECT * FROM products WHERE product_id = ?",
            &["nonexistent".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
}

// ---------------------------------------------------------------------------
// execute_scalar
// ---------------------------------------------------------------------------

#[test]
fn execute_scalar_returns_single_value() {
    let (conn, _tmp) = sample_connection();

    let result = conn
        .execute_scalar("SELECT COUNT(*) FROM purchases", &[])
        .unwrap();
    assert_eq!(result.unwrap().as_i64().unwrap(), 8);
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let (conn, _tmp) = sample_connection();

    let result = conn
        .execute_scalar(
            "SELECT product_name FROM products WHERE product_id = ?",
            &["nonexistent".to_string()],
        )
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// ensure_tables
// ---------------------------------------------------------------------------

#[test]
fn ensure_tables_loads_each_file_once() {
    let (conn, _tmp) = sample_connection();
    assert_eq!(conn.tables(), vec!["carts", "products", "purchases"]);

    // Already registered, so this is a no-op.
    conn.ensure_tables(&["carts"]).unwrap();
    assert_eq!(conn.tables().len(), 3);
}

#[test]
fn ensure_tables_missing_file_is_not_found() {
    let (conn, _tmp) = empty_connection();

    let err = conn.ensure_tables(&["purchases"]).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
    assert!(!conn.has_table("purchases"));
}

#[test]
fn ensure_tables_unknown_table_is_not_found() {
    let (conn, _tmp) = empty_connection();

    let err = conn.ensure_tables(&["recipes"]).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// register_table_from_ndjson
// ---------------------------------------------------------------------------

#[test]
fn register_table_from_ndjson_creates_queryable_table() {
    let (conn, _tmp) = empty_connection();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"id": 1, "name": "Alpha"}}"#).unwrap();
    writeln!(file, r#"{{"id": 2, "name": "Beta"}}"#).unwrap();
    file.flush().unwrap();

    conn.register_table_from_ndjson("test_table", file.path().to_str().unwrap())
        .unwrap();

    let rows = conn.execute("SELECT * FROM test_table ORDER BY id", &[]).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Alpha");
    assert_eq!(rows[1]["name"], "Beta");
    assert!(conn.has_table("test_table"));
}

#[test]
fn register_table_replaces_existing_table() {
    let (conn, _tmp) = empty_connection();

    let mut file1 = NamedTempFile::new().unwrap();
    writeln!(file1, r#"{{"val": "old"}}"#).unwrap();
    file1.flush().unwrap();
    conn.register_table_from_ndjson("replaceable", file1.path().to_str().unwrap())
        .unwrap();

    let mut file2 = NamedTempFile::new().unwrap();
    writeln!(file2, r#"{{"val": "new"}}"#).unwrap();
    file2.flush().unwrap();
    conn.register_table_from_ndjson("replaceable", file2.path().to_str().unwrap())
        .unwrap();

    let rows = conn.execute("SELECT * FROM replaceable", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["val"], "new");
}

// ---------------------------------------------------------------------------
// reset_tables
// ---------------------------------------------------------------------------

#[test]
fn reset_tables_forgets_registrations() {
    let (conn, _tmp) = sample_connection();
    assert!(conn.has_table("carts"));

    conn.reset_tables();

    assert!(conn.tables().is_empty());
    assert!(!conn.has_table("carts"));
}

#[test]
fn reset_tables_picks_up_rewritten_files() {
    let (conn, _tmp) = sample_connection();

    conn.data_dir
        .borrow()
        .write_table(
            "carts",
            &[serde_json::json!({"cart_id": "c9", "user_id": "user-9"})],
        )
        .unwrap();
    conn.reset_tables();
    conn.ensure_tables(&["carts"]).unwrap();

    let rows = conn.execute("SELECT * FROM carts", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["cart_id"], "c9");
}

// ---------------------------------------------------------------------------
// execute_into
// ---------------------------------------------------------------------------

#[test]
fn execute_into_deserializes_rows() {
    let (conn, _tmp) = sample_connection();

    #[derive(serde::Deserialize, Debug)]
    struct CatalogRow {
        product_id: String,
        product_name: String,
    }

    let rows: Vec<CatalogRow> = conn
        .execute_into(
            "SELECT product_id, product_name FROM products ORDER BY product_id",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].product_id, "p1");
    assert_eq!(rows[0].product_name, "Milk");
}

// ---------------------------------------------------------------------------
// Type conversions
// ---------------------------------------------------------------------------

#[test]
fn null_values_are_converted_to_json_null() {
    let (conn, _tmp) = sample_connection();

    let rows = conn
        .execute(
            "SELECT product_quantity FROM purchases WHERE purchase_id = ?",
            &["pu7".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0]["product_quantity"].is_null());
}

#[test]
fn numeric_values_are_converted_correctly() {
    let (conn, _tmp) = sample_connection();

    let rows = conn
        .execute(
            "SELECT CAST(unit_price AS DOUBLE) AS price FROM products WHERE product_id = ?",
            &["p3".to_string()],
        )
        .unwrap();
    let price = rows[0]["price"].as_f64().unwrap();
    assert!((price - 1.25).abs() < f64::EPSILON);
}

#[test]
fn ledger_columns_are_loaded_as_text() {
    let (conn, _tmp) = sample_connection();

    let rows = conn
        .execute(
            "SELECT product_quantity, product_price, input_date FROM purchases \
             WHERE purchase_id = ?",
            &["pu1".to_string()],
        )
        .unwrap();
    assert_eq!(rows[0]["product_quantity"], "2");
    let price: f64 = rows[0]["product_price"].as_str().unwrap().parse().unwrap();
    assert!((price - 3.0).abs() < f64::EPSILON);
    assert_eq!(rows[0]["input_date"], "2024-01-05T10:00:00");
}

#[test]
fn ledger_tables_only_keep_declared_columns() {
    let (conn, _tmp) = sample_connection();

    // carts.ndjson also carries cart_name, which the ledger never reads.
    let rows = conn.execute("SELECT * FROM carts LIMIT 1", &[]).unwrap();
    let mut columns: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    columns.sort_unstable();
    assert_eq!(columns, vec!["cart_id", "user_id"]);
}

#[test]
fn empty_ledger_file_loads_as_empty_table() {
    let (conn, _tmp) = empty_connection();
    conn.data_dir
        .borrow()
        .write_table::<serde_json::Value>("purchases", &[])
        .unwrap();

    conn.ensure_tables(&["purchases"]).unwrap();

    let rows = conn
        .execute(
            "SELECT * FROM purchases WHERE CAST(cart_id AS VARCHAR) IN (?)",
            &["c1".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(
        conn.execute_scalar("SELECT COUNT(*) FROM purchases", &[])
            .unwrap()
            .unwrap(),
        0
    );
}

#[test]
fn timestamps_are_converted_to_iso_strings() {
    let (conn, _tmp) = empty_connection();

    let rows = conn
        .execute(
            "SELECT TIMESTAMP '2024-01-05 10:00:00' AS at, \
                    TIMESTAMP '2024-01-05 10:00:00.250' AS frac",
            &[],
        )
        .unwrap();
    assert_eq!(rows[0]["at"], "2024-01-05T10:00:00");
    assert_eq!(rows[0]["frac"], "2024-01-05T10:00:00.250");
}

#[test]
fn dates_are_converted_to_iso_strings() {
    let (conn, _tmp) = empty_connection();

    let rows = conn
        .execute("SELECT DATE '2024-02-29' AS d", &[])
        .unwrap();
    assert_eq!(rows[0]["d"], "2024-02-29");
}

// ---------------------------------------------------------------------------
// raw
// ---------------------------------------------------------------------------

#[test]
fn raw_provides_access_to_underlying_duckdb_connection() {
    let (conn, _tmp) = empty_connection();

    let raw = conn.raw();
    raw.execute_batch("CREATE TABLE raw_test (id INTEGER, value TEXT)")
        .unwrap();
    raw.execute_batch("INSERT INTO raw_test VALUES (1, 'hello')")
        .unwrap();

    let rows = conn.execute("SELECT * FROM raw_test", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["value"], "hello");
}
