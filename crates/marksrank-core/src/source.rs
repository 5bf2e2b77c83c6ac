//! Reference data access
//!
//! [`ReferenceSource`] is the seam between the estimator and whatever holds
//! the reference tables. The SQLite [`crate::db::Database`] implements it for
//! real data; [`MemorySource`] keeps tables in memory for tests and fixtures.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::difficulty::{Difficulty, ShiftKey};
use crate::error::{RankError, Result};
use crate::reference::{ReferencePoint, ReferenceRow};

/// Read-only access to reference tables
pub trait ReferenceSource {
    /// Every (score, percentile) pair of one difficulty column.
    ///
    /// Rows with no marks recorded for the column are skipped. Order is
    /// unspecified.
    fn reference_points(&self, table: &str, difficulty: Difficulty)
        -> Result<Vec<ReferencePoint>>;

    /// Label stored for `shift` on the row keyed by `date_key`.
    ///
    /// Returns `Ok(None)` when no row matches the date and
    /// [`RankError::MissingColumn`] when the shift column does not exist. An
    /// empty cell comes back as an empty label.
    fn shift_label(&self, table: &str, date_key: &str, shift: &ShiftKey)
        -> Result<Option<String>>;
}

impl<S: ReferenceSource + ?Sized> ReferenceSource for &S {
    fn reference_points(
        &self,
        table: &str,
        difficulty: Difficulty,
    ) -> Result<Vec<ReferencePoint>> {
        (**self).reference_points(table, difficulty)
    }

    fn shift_label(
        &self,
        table: &str,
        date_key: &str,
        shift: &ShiftKey,
    ) -> Result<Option<String>> {
        (**self).shift_label(table, date_key, shift)
    }
}

#[derive(Debug, Default, Clone)]
struct ShiftTable {
    columns: BTreeSet<String>,
    rows: HashMap<String, HashMap<String, String>>,
}

/// In-memory reference tables
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: HashMap<String, Vec<ReferenceRow>>,
    shift_tables: HashMap<String, ShiftTable>,
    reads: AtomicU64,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a marks-vs-percentile table
    pub fn with_table(mut self, table: &str, rows: Vec<ReferenceRow>) -> Self {
        self.insert_table(table, rows);
        self
    }

    /// Add a single-column table whose points apply to every difficulty
    pub fn with_points(self, table: &str, points: &[(f64, f64)]) -> Self {
        let rows = points
            .iter()
            .map(|&(score, percentile)| ReferenceRow::uniform(percentile, score))
            .collect();
        self.with_table(table, rows)
    }

    /// Record the label for one date and shift, creating the column if needed
    pub fn with_shift_label(mut self, table: &str, date_key: &str, shift: u32, label: &str) -> Self {
        self.insert_shift_label(table, date_key, shift, label);
        self
    }

    pub fn insert_table(&mut self, table: &str, rows: Vec<ReferenceRow>) {
        self.tables.insert(table.to_string(), rows);
    }

    pub fn insert_shift_label(&mut self, table: &str, date_key: &str, shift: u32, label: &str) {
        let column = ShiftKey::new(shift).column().to_string();
        let entry = self.shift_tables.entry(table.to_string()).or_default();
        entry.columns.insert(column.clone());
        entry
            .rows
            .entry(date_key.to_string())
            .or_default()
            .insert(column, label.to_string());
    }

    /// Number of reads served so far
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }
}

impl ReferenceSource for MemorySource {
    fn reference_points(
        &self,
        table: &str,
        difficulty: Difficulty,
    ) -> Result<Vec<ReferencePoint>> {
        self.record_read();
        let rows = self.tables.get(table).ok_or_else(|| {
            RankError::db_operation("read reference table", format!("no such table: {}", table))
        })?;

        Ok(rows.iter().filter_map(|row| row.point_for(difficulty)).collect())
    }

    fn shift_label(
        &self,
        table: &str,
        date_key: &str,
        shift: &ShiftKey,
    ) -> Result<Option<String>> {
        self.record_read();
        let shifts = self.shift_tables.get(table).ok_or_else(|| {
            RankError::db_operation("read difficulty table", format!("no such table: {}", table))
        })?;

        if !shifts.columns.contains(shift.column()) {
            return Err(RankError::MissingColumn {
                table: table.to_string(),
                column: shift.column().to_string(),
            });
        }

        Ok(shifts.rows.get(date_key).map(|row| {
            row.get(shift.column())
                .cloned()
                .unwrap_or_default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_points_skip_missing_scores() {
        let src = MemorySource::new().with_table(
            "marks",
            vec![
                ReferenceRow {
                    percentile: 50.0,
                    easy: Some(60.0),
                    medium: None,
                    hard: Some(40.0),
                },
                ReferenceRow::uniform(90.0, 150.0),
            ],
        );

        let medium = src.reference_points("marks", Difficulty::Medium).unwrap();
        assert_eq!(medium, vec![ReferencePoint::new(150.0, 90.0)]);

        let hard = src.reference_points("marks", Difficulty::Hard).unwrap();
        assert_eq!(hard.len(), 2);
        assert_eq!(src.reads(), 2);
    }

    #[test]
    fn test_unknown_table_is_data_access_error() {
        let src = MemorySource::new();
        let err = src
            .reference_points("missing", Difficulty::Easy)
            .unwrap_err();
        assert_eq!(err.error_type(), "data_access");
    }

    #[test]
    fn test_empty_cell_reads_as_empty_label() {
        let src = MemorySource::new()
            .with_shift_label("diff", "01-01-2024", 1, "Easy")
            .with_shift_label("diff", "02-01-2024", 2, "Hard");

        let label = src
            .shift_label("diff", "01-01-2024", &ShiftKey::new(2))
            .unwrap();
        assert_eq!(label.as_deref(), Some(""));
    }

    #[test]
    fn test_borrowed_source_forwards() {
        let src = MemorySource::new().with_points("t", &[(10.0, 20.0)]);
        let borrowed: &MemorySource = &src;
        assert_eq!(
            ReferenceSource::reference_points(&borrowed, "t", Difficulty::Hard)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(src.reads(), 1);
    }
}
