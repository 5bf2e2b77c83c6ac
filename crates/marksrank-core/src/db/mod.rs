//! SQLite reference store for marksrank

mod load;
mod reference;
mod schema;

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::config::TableNames;
use crate::error::{RankError, Result};
use crate::map_db_err;

pub use load::LoadStats;
pub use schema::{
    create_schema, quote_ident, table_columns, CURRENT_SCHEMA_VERSION, DATE_COLUMN,
    PERCENTILE_COLUMN,
};

/// Row count of one stored table
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: i64,
}

/// SQLite database holding the reference tables
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    tables: TableNames,
    read_only: bool,
}

impl Database {
    /// Open or create the database at `path`, creating missing tables.
    ///
    /// Reference data cannot be regenerated, so a corrupted file is reported
    /// rather than replaced.
    pub fn open(path: &Path, tables: &TableNames) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| {
            RankError::db_operation(&format!("open database at {}", path.display()), e)
        })?;

        let result = conn
            .pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| map_db_err!("enable WAL mode", e))
            .and_then(|()| Self::from_connection(conn, tables));

        Self::log_corruption(path, &result);
        result
    }

    /// Open an existing database for reading only.
    ///
    /// Nothing is created or written. The stored schema version must be
    /// supported and every configured table must already exist.
    pub fn open_existing(path: &Path, tables: &TableNames) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            RankError::db_operation(&format!("open database at {}", path.display()), e)
        })?;

        let result = Self::check_existing(&conn, tables).map(|()| Database {
            conn,
            tables: tables.clone(),
            read_only: true,
        });

        Self::log_corruption(path, &result);
        result
    }

    fn check_existing(conn: &Connection, tables: &TableNames) -> Result<()> {
        let version = schema::stored_schema_version(conn)
            .map_err(|e| map_db_err!("read schema version", e))?;
        match version {
            None => {
                return Err(RankError::db_operation(
                    "open reference database",
                    "no schema version recorded (run `marksrank init`)",
                ))
            }
            Some(version) => check_schema_version(version)?,
        }

        for table in tables.all() {
            let columns =
                table_columns(conn, table).map_err(|e| map_db_err!("read table columns", e))?;
            if columns.is_empty() {
                return Err(RankError::db_operation(
                    "open reference database",
                    format!("no such table: {}", table),
                ));
            }
        }
        Ok(())
    }

    fn log_corruption(path: &Path, result: &Result<Self>) {
        if let Err(e) = result {
            if Self::is_corruption_error(e) {
                tracing::error!(path = %path.display(), error = %e, "reference database is corrupted");
            }
        }
    }

    /// In-memory database, mostly for tests
    pub fn open_in_memory(tables: &TableNames) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| map_db_err!("open database", e))?;
        Self::from_connection(conn, tables)
    }

    fn from_connection(conn: Connection, tables: &TableNames) -> Result<Self> {
        let previous = schema::stored_schema_version(&conn)
            .map_err(|e| map_db_err!("read schema version", e))?;
        if let Some(version) = previous {
            check_schema_version(version)?;
        }

        create_schema(&conn, tables).map_err(|e| map_db_err!("create database schema", e))?;
        if previous.is_none() {
            tracing::info!("created reference database schema");
        }

        Ok(Database {
            conn,
            tables: tables.clone(),
            read_only: false,
        })
    }

    /// Check if an error indicates database corruption
    fn is_corruption_error(error: &RankError) -> bool {
        match error {
            RankError::DataAccess { reason, .. } => {
                let msg_lower = reason.to_lowercase();
                msg_lower.contains("database disk image is malformed")
                    || msg_lower.contains("malformed")
                    || msg_lower.contains("file is not a database")
            }
            _ => false,
        }
    }

    /// Table names this database was opened with
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    pub fn get_schema_version(&self) -> Result<i32> {
        schema::stored_schema_version(&self.conn)
            .map_err(|e| map_db_err!("get schema version", e))
            .map(|v| v.unwrap_or(0))
    }

    /// Row count of every configured table
    pub fn table_counts(&self) -> Result<Vec<TableCount>> {
        self.tables
            .all()
            .into_iter()
            .map(|table| {
                Ok(TableCount {
                    table: table.to_string(),
                    rows: self.row_count(table)?,
                })
            })
            .collect()
    }

    /// Shift columns present in the difficulty table, in shift order
    pub fn shift_columns(&self) -> Result<Vec<String>> {
        let mut shifts: Vec<(u32, String)> = table_columns(&self.conn, &self.tables.difficulty)
            .map_err(|e| map_db_err!("read difficulty columns", e))?
            .into_iter()
            .filter_map(|column| {
                let n = column.strip_prefix("Shift_")?.parse().ok()?;
                Some((n, column))
            })
            .collect();
        shifts.sort();
        Ok(shifts.into_iter().map(|(_, column)| column).collect())
    }
}

/// Reject databases written by a newer marksrank
fn check_schema_version(version: i32) -> Result<()> {
    if version > CURRENT_SCHEMA_VERSION {
        return Err(RankError::invalid_value(
            "database schema version",
            format!("{} (supported: {})", version, CURRENT_SCHEMA_VERSION),
        ));
    }
    Ok(())
}

impl Drop for Database {
    fn drop(&mut self) {
        // Checkpoint WAL so the main file is complete once we close
        if !self.read_only {
            let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
        }
    }
}
