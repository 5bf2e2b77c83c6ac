use rusqlite::params;
use serde::Serialize;

use super::schema::{quote_ident, table_columns, DATE_COLUMN, PERCENTILE_COLUMN};
use super::Database;
use crate::difficulty::ShiftKey;
use crate::error::Result;
use crate::map_db_err;
use crate::pack::ReferencePack;
use crate::reference::{ReferenceRow, ReferenceTable};

/// Rows written by a pack import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub score_rows: usize,
    pub difficulty_dates: usize,
    pub shift_columns_added: usize,
    /// Score tables that already held rows and were appended to
    pub appended_to: Vec<String>,
}

impl Database {
    /// Import a reference pack in one transaction.
    ///
    /// With `replace`, existing rows of every table are removed first.
    /// Otherwise score rows are appended and difficulty labels are upserted
    /// by date. Appending to a non-empty score table is reported in
    /// [`LoadStats::appended_to`], since the old rows stay in the bracket.
    #[tracing::instrument(skip(self, pack))]
    pub fn load_pack(&self, pack: &ReferencePack, replace: bool) -> Result<LoadStats> {
        pack.validate()?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| map_db_err!("begin load transaction", e))?;

        if replace {
            for table in self.tables.all() {
                tx.execute(&format!("DELETE FROM {}", quote_ident(table)), [])
                    .map_err(|e| map_db_err!("clear table", e))?;
            }
        }

        let mut stats = LoadStats::default();
        for table in ReferenceTable::ALL {
            let name = self.tables.name_for(table);
            let rows = pack.rows(table);
            if !replace && !rows.is_empty() && self.row_count(name)? > 0 {
                tracing::warn!(
                    table = name,
                    "appending to a table that already has rows; use replace to re-import"
                );
                stats.appended_to.push(name.to_string());
            }
            stats.score_rows += self.insert_rows(name, rows)?;
        }

        if let Some(max_shift) = pack.max_shift() {
            stats.shift_columns_added = self.ensure_shift_columns(max_shift)?;
        }
        for entry in &pack.difficulty {
            for (shift, label) in &entry.shifts {
                self.upsert_shift_label(&entry.date, &ShiftKey::new(*shift), label)?;
            }
            stats.difficulty_dates += 1;
        }

        tx.commit()
            .map_err(|e| map_db_err!("commit load transaction", e))?;

        tracing::info!(
            score_rows = stats.score_rows,
            difficulty_dates = stats.difficulty_dates,
            "loaded reference pack"
        );
        Ok(stats)
    }

    pub(super) fn row_count(&self, table: &str) -> Result<i64> {
        self.conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
                [],
                |r| r.get(0),
            )
            .map_err(|e| map_db_err!("count rows", e))
    }

    fn insert_rows(&self, table: &str, rows: &[ReferenceRow]) -> Result<usize> {
        let sql = format!(
            "INSERT INTO {} ({}, \"Easy\", \"Medium\", \"Hard\") VALUES (?1, ?2, ?3, ?4)",
            quote_ident(table),
            quote_ident(PERCENTILE_COLUMN)
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| map_db_err!("prepare reference insert", e))?;

        for row in rows {
            stmt.execute(params![row.percentile, row.easy, row.medium, row.hard])
                .map_err(|e| map_db_err!("insert reference row", e))?;
        }
        Ok(rows.len())
    }

    /// Add `Shift_1..=Shift_<max_shift>` columns that do not exist yet
    fn ensure_shift_columns(&self, max_shift: u32) -> Result<usize> {
        let table = &self.tables.difficulty;
        let existing = table_columns(&self.conn, table)
            .map_err(|e| map_db_err!("read difficulty columns", e))?;

        let mut added = 0;
        for shift in 1..=max_shift {
            let key = ShiftKey::new(shift);
            if existing.iter().any(|c| c == key.column()) {
                continue;
            }
            self.conn
                .execute(
                    &format!(
                        "ALTER TABLE {} ADD COLUMN {} TEXT",
                        quote_ident(table),
                        quote_ident(key.column())
                    ),
                    [],
                )
                .map_err(|e| map_db_err!("add shift column", e))?;
            added += 1;
        }
        Ok(added)
    }

    fn upsert_shift_label(&self, date_key: &str, shift: &ShiftKey, label: &str) -> Result<()> {
        let column = quote_ident(shift.column());
        let sql = format!(
            "INSERT INTO {table} ({date}, {column}) VALUES (?1, ?2)
             ON CONFLICT({date}) DO UPDATE SET {column} = excluded.{column}",
            table = quote_ident(&self.tables.difficulty),
            date = quote_ident(DATE_COLUMN),
            column = column,
        );
        self.conn
            .execute(&sql, params![date_key, label])
            .map_err(|e| map_db_err!("write difficulty label", e))?;
        Ok(())
    }
}
