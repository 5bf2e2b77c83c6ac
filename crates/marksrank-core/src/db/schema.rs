//! SQLite schema for the reference tables

use rusqlite::{Connection, OptionalExtension, Result};

use crate::config::TableNames;

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Column holding the percentile level of a score table row
pub const PERCENTILE_COLUMN: &str = "Percentile";

/// Key column of the difficulty table
pub const DATE_COLUMN: &str = "Date";

const META_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS store_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

/// Quote an identifier for use in SQL text
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn score_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    \"Percentile\" REAL NOT NULL,\n    \"Easy\" REAL,\n    \"Medium\" REAL,\n    \"Hard\" REAL\n);",
        quote_ident(table)
    )
}

fn difficulty_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    \"Date\" TEXT PRIMARY KEY\n);",
        quote_ident(table)
    )
}

/// Read the stored schema version, if any
pub fn stored_schema_version(conn: &Connection) -> Result<Option<i32>> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'store_meta'",
        [],
        |r| r.get(0),
    )?;
    if !exists {
        return Ok(None);
    }

    conn.query_row(
        "SELECT value FROM store_meta WHERE key = 'schema_version'",
        [],
        |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
    )
    .optional()
}

/// Create any missing tables and record the schema version
pub fn create_schema(conn: &Connection, tables: &TableNames) -> Result<()> {
    conn.execute_batch(META_SQL)?;

    for table in [&tables.aggregate, &tables.math, &tables.physics_chemistry] {
        conn.execute_batch(&score_table_sql(table))?;
    }
    conn.execute_batch(&difficulty_table_sql(&tables.difficulty))?;

    conn.execute(
        "INSERT INTO store_meta (key, value) VALUES ('schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [CURRENT_SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Column names of a table; empty when the table does not exist
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>>>()?;
    Ok(columns)
}
