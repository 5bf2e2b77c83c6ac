//! Difficulty routing
//!
//! Every exam shift is tagged with a difficulty label. The label selects which
//! marks column of each reference table applies to candidates of that shift.
//! The difficulty table is keyed by `DD-MM-YYYY` dates and has one
//! `Shift_<n>` column per sitting.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RankError, Result};
use crate::source::ReferenceSource;

/// Date format accepted from callers
pub const EXAM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format used as the key of the difficulty table
pub const DATE_KEY_FORMAT: &str = "%d-%m-%Y";

/// Difficulty label of an exam shift, doubling as a reference column name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Column name in the reference tables
    pub fn column(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = RankError;

    /// Labels are column names, so matching is exact.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(RankError::InvalidDifficulty {
                label: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Name of the difficulty-table column for one shift, e.g. `Shift_2`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShiftKey {
    column: String,
}

impl ShiftKey {
    pub fn new(shift: u32) -> Self {
        Self {
            column: format!("Shift_{}", shift),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }
}

impl fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column)
    }
}

/// Parse a caller-supplied `YYYY-MM-DD` exam date
pub fn parse_exam_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), EXAM_DATE_FORMAT)
        .map_err(|_| RankError::invalid_value("exam date (expected YYYY-MM-DD)", value))
}

/// Reformat a date into the difficulty table's `DD-MM-YYYY` key
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Look up the difficulty label assigned to a date and shift
pub fn resolve_difficulty<S: ReferenceSource + ?Sized>(
    source: &S,
    difficulty_table: &str,
    exam_date: NaiveDate,
    shift: u32,
) -> Result<Difficulty> {
    let date_key = format_date_key(exam_date);
    let shift_key = ShiftKey::new(shift);

    let label = source
        .shift_label(difficulty_table, &date_key, &shift_key)?
        .ok_or_else(|| RankError::DifficultyNotFound {
            date: date_key.clone(),
            shift,
        })?;

    let difficulty = label.parse::<Difficulty>()?;

    debug!(
        date = %date_key,
        shift = %shift_key,
        difficulty = %difficulty,
        "resolve_difficulty"
    );

    Ok(difficulty)
}
