//! Local ledger directory holding the NDJSON table files.
//!
//! Table files are located lazily on first access. A table whose file does
//! not exist is a [`LedgerError::NotFound`], surfaced before any analytics run.

use crate::config;
use crate::error::{LedgerError, Result};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Locates (and optionally writes) the ledger's table files.
pub struct DataDir {
    /// Directory where table files live.
    pub root: PathBuf,
}

impl DataDir {
    /// Open a ledger directory.
    ///
    /// If `root` is `None`, uses the platform-appropriate default data directory.
    /// Creates the directory if it does not exist.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let dir = root.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { root: dir })
    }

    /// Path a table's file would live at, whether or not it exists yet.
    pub fn table_path(&self, table: &str) -> Result<PathBuf> {
        let files = config::table_files();
        let filename = files
            .get(table)
            .ok_or_else(|| LedgerError::NotFound(format!("Unknown ledger table: {}", table)))?;
        Ok(self.root.join(filename))
    }

    /// Ensure a table file exists locally.
    ///
    /// # Returns
    ///
    /// Local filesystem path to the NDJSON file.
    pub fn ensure_table(&self, table: &str) -> Result<PathBuf> {
        let path = self.table_path(table)?;
        if !path.exists() {
            return Err(LedgerError::NotFound(format!(
                "Ledger table '{}' has no data file at {}",
                table,
                path.display()
            )));
        }
        Ok(path)
    }

    /// Write rows as NDJSON to a table's file, replacing any previous contents.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a truncated table behind.
    pub fn write_table<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<PathBuf> {
        let dest = self.table_path(table)?;
        let tmp_dest = dest.with_extension("ndjson.tmp");

        let result = (|| -> Result<()> {
            let mut out = BufWriter::new(fs::File::create(&tmp_dest)?);
            for row in rows {
                serde_json::to_writer(&mut out, row)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
            fs::rename(&tmp_dest, &dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }
        result.map(|_| dest)
    }

    /// Whether a table's file is present.
    pub fn has_table(&self, table: &str) -> bool {
        self.table_path(table).map(|p| p.exists()).unwrap_or(false)
    }

    /// Remove all table files and recreate the directory.
    pub fn clear(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}
