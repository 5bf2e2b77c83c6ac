use rusqlite::OptionalExtension;

use super::schema::{quote_ident, table_columns, DATE_COLUMN, PERCENTILE_COLUMN};
use super::Database;
use crate::difficulty::{Difficulty, ShiftKey};
use crate::error::{RankError, Result};
use crate::map_db_err;
use crate::reference::ReferencePoint;
use crate::source::ReferenceSource;

impl ReferenceSource for Database {
    fn reference_points(
        &self,
        table: &str,
        difficulty: Difficulty,
    ) -> Result<Vec<ReferencePoint>> {
        let sql = format!(
            "SELECT {}, {} FROM {}",
            quote_ident(PERCENTILE_COLUMN),
            quote_ident(difficulty.column()),
            quote_ident(table)
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| map_db_err!("read reference table", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, Option<f64>>(0)?, row.get::<_, Option<f64>>(1)?))
            })
            .map_err(|e| map_db_err!("read reference table", e))?;

        let mut points = Vec::new();
        for row in rows {
            let (percentile, score) = row.map_err(|e| map_db_err!("read reference row", e))?;
            if let (Some(percentile), Some(score)) = (percentile, score) {
                points.push(ReferencePoint::new(score, percentile));
            }
        }

        tracing::trace!(table, %difficulty, points = points.len(), "reference_points");
        Ok(points)
    }

    fn shift_label(
        &self,
        table: &str,
        date_key: &str,
        shift: &ShiftKey,
    ) -> Result<Option<String>> {
        let columns =
            table_columns(&self.conn, table).map_err(|e| map_db_err!("read difficulty table", e))?;
        if columns.is_empty() {
            return Err(RankError::db_operation(
                "read difficulty table",
                format!("no such table: {}", table),
            ));
        }
        if !columns.iter().any(|c| c == shift.column()) {
            return Err(RankError::MissingColumn {
                table: table.to_string(),
                column: shift.column().to_string(),
            });
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            quote_ident(shift.column()),
            quote_ident(table),
            quote_ident(DATE_COLUMN)
        );

        let label: Option<Option<String>> = self
            .conn
            .query_row(&sql, [date_key], |row| row.get(0))
            .optional()
            .map_err(|e| map_db_err!("read difficulty table", e))?;

        Ok(label.map(Option::unwrap_or_default))
    }
}
