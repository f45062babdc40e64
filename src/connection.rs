//! DuckDB connection wrapper with table registration and query execution.
//!
//! Ledger tables are NDJSON files loaded into in-memory DuckDB tables on first
//! use. Query results come back as loosely typed rows, ready for the
//! [`normalize`](crate::normalize) layer.

use crate::config;
use crate::data_dir::DataDir;
use crate::error::{LedgerError, Result};
use crate::normalize::RawRecord;
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection as DuckDbConnection;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Wraps a DuckDB connection and registers ledger NDJSON files as tables.
pub struct Connection {
    conn: DuckDbConnection,
    /// The ledger directory tables are loaded from.
    pub data_dir: RefCell<DataDir>,
    registered_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Create a connection backed by the given ledger directory.
    ///
    /// Opens an in-memory DuckDB database.
    pub fn new(data_dir: DataDir) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            data_dir: RefCell::new(data_dir),
            registered_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Ensure one or more tables are registered, loading them from disk if needed.
    pub fn ensure_tables(&self, tables: &[&str]) -> Result<()> {
        for name in tables {
            if !self.registered_tables.borrow().contains(*name) {
                self.ensure_table(name)?;
            }
        }
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of rows.
    ///
    /// Automatically converts DuckDB types to `serde_json::Value`; dates and
    /// timestamps become ISO-8601 strings.
    pub fn execute(&self, sql: &str, params: &[String]) -> Result<Vec<RawRecord>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run
        let column_names: Vec<String> = rows_result
            .as_ref()
            .map(|s| s.column_names().into_iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();

        let mut out: Vec<RawRecord> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[String]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[String]) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Create a DuckDB table from a newline-delimited JSON file.
    ///
    /// Column types are inferred by DuckDB, replacing any table of the same name.
    pub fn register_table_from_ndjson(&self, table_name: &str, ndjson_path: &str) -> Result<()> {
        let path_fwd = sql_path(ndjson_path);
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}; \
             CREATE TABLE {} AS SELECT * FROM read_json_auto('{}', format='newline_delimited')",
            table_name, table_name, path_fwd
        ))?;
        self.registered_tables
            .borrow_mut()
            .insert(table_name.to_string());
        tracing::debug!(table = table_name, path = %path_fwd, "registered ndjson table");
        Ok(())
    }

    /// Create a ledger table with a fixed column set, every column `VARCHAR`.
    ///
    /// Nothing is inferred from the file, so an empty file still yields a
    /// table with all its columns, and an oddly typed value in any row is
    /// left for the normalizer to reject.
    pub fn register_ledger_table(
        &self,
        table_name: &str,
        ndjson_path: &Path,
        columns: &[&str],
    ) -> Result<()> {
        let path_fwd = sql_path(&ndjson_path.to_string_lossy());
        let column_defs: Vec<String> = columns.iter().map(|c| format!("{} VARCHAR", c)).collect();
        let mut batch = format!(
            "DROP TABLE IF EXISTS {t}; CREATE TABLE {t} ({defs});",
            t = table_name,
            defs = column_defs.join(", ")
        );

        // A zero-byte file has nothing to read
        if fs::metadata(ndjson_path)?.len() > 0 {
            let struct_cols: Vec<String> =
                columns.iter().map(|c| format!("{}: 'VARCHAR'", c)).collect();
            batch.push_str(&format!(
                " INSERT INTO {t} SELECT {cols} FROM read_json('{path}', \
                 format='newline_delimited', columns={{{spec}}});",
                t = table_name,
                cols = columns.join(", "),
                path = path_fwd,
                spec = struct_cols.join(", ")
            ));
        }

        self.conn.execute_batch(&batch)?;
        self.registered_tables
            .borrow_mut()
            .insert(table_name.to_string());
        tracing::debug!(table = table_name, path = %path_fwd, "registered ledger table");
        Ok(())
    }

    /// Check whether a table has been registered.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// Return a sorted list of all registered table names.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Forget registered tables so they are reloaded from disk on next access.
    pub fn reset_tables(&self) {
        self.registered_tables.borrow_mut().clear();
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    fn ensure_table(&self, table_name: &str) -> Result<()> {
        let path = self.data_dir.borrow().ensure_table(table_name)?;
        let columns = config::table_columns(table_name).ok_or_else(|| {
            LedgerError::NotFound(format!("Unknown ledger table: {}", table_name))
        })?;
        self.register_ledger_table(table_name, &path, columns)
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    use serde_json::Value;

    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => Value::Number(n.into()),
        ValueRef::SmallInt(n) => Value::Number(n.into()),
        ValueRef::Int(n) => Value::Number(n.into()),
        ValueRef::BigInt(n) => Value::Number(n.into()),
        ValueRef::UTinyInt(n) => Value::Number(n.into()),
        ValueRef::USmallInt(n) => Value::Number(n.into()),
        ValueRef::UInt(n) => Value::Number(n.into()),
        ValueRef::UBigInt(n) => Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => Value::Number(i.into()),
            Err(_) => Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).to_string()),
        ValueRef::Date32(days) => NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
        ValueRef::Timestamp(unit, v) => {
            let micros = match unit {
                TimeUnit::Second => v.checked_mul(1_000_000),
                TimeUnit::Millisecond => v.checked_mul(1_000),
                TimeUnit::Microsecond => Some(v),
                TimeUnit::Nanosecond => Some(v / 1_000),
            };
            micros
                .and_then(DateTime::<Utc>::from_timestamp_micros)
                .map(|dt| Value::String(dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string()))
                .unwrap_or(Value::Null)
        }
        // Lists, structs, intervals and blobs have no ledger meaning
        _ => Value::Null,
    }
}

/// Forward slashes and doubled quotes, for embedding a path in a SQL literal.
fn sql_path(path: &str) -> String {
    path.replace('\\', "/").replace('\'', "''")
}

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;
