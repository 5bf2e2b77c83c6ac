//! Reference packs
//!
//! A pack is a JSON document carrying every reference table for one exam
//! season. It is the import format for the SQLite store and can also seed
//! an in-memory source directly.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::TableNames;
use crate::difficulty::{Difficulty, DATE_KEY_FORMAT};
use crate::error::{RankError, Result};
use crate::reference::{ReferenceRow, ReferenceTable};
use crate::source::MemorySource;

/// Difficulty labels of every shift on one exam date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyEntry {
    /// Date key in `DD-MM-YYYY` form
    pub date: String,
    /// Shift number to label
    pub shifts: BTreeMap<u32, String>,
}

/// Every reference table needed to evaluate candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencePack {
    #[serde(default)]
    pub marks: Vec<ReferenceRow>,
    #[serde(default)]
    pub math: Vec<ReferenceRow>,
    #[serde(default)]
    pub physics_chemistry: Vec<ReferenceRow>,
    #[serde(default)]
    pub difficulty: Vec<DifficultyEntry>,
}

impl ReferencePack {
    /// Read and validate a pack from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RankError::Other(format!("failed to read pack {}: {}", path.display(), e))
        })?;
        let pack: ReferencePack = serde_json::from_str(&content)?;
        pack.validate()?;
        Ok(pack)
    }

    /// Rows of one logical score table
    pub fn rows(&self, table: ReferenceTable) -> &[ReferenceRow] {
        match table {
            ReferenceTable::Aggregate => &self.marks,
            ReferenceTable::Math => &self.math,
            ReferenceTable::PhysicsChemistry => &self.physics_chemistry,
        }
    }

    /// Highest shift number referenced by any entry
    pub fn max_shift(&self) -> Option<u32> {
        self.difficulty
            .iter()
            .filter_map(|entry| entry.shifts.keys().next_back().copied())
            .max()
    }

    /// Check dates, labels, shift numbers and numeric values
    pub fn validate(&self) -> Result<()> {
        for table in ReferenceTable::ALL {
            for row in self.rows(table) {
                let scores = Difficulty::ALL.map(|d| row.score_for(d));
                let finite = row.percentile.is_finite()
                    && scores.iter().flatten().all(|s| s.is_finite());
                if !finite {
                    return Err(RankError::invalid_value(
                        &format!("{} reference row", table),
                        format!("{:?}", row),
                    ));
                }
            }
        }

        for entry in &self.difficulty {
            NaiveDate::parse_from_str(&entry.date, DATE_KEY_FORMAT).map_err(|_| {
                RankError::invalid_value("difficulty date (expected DD-MM-YYYY)", &entry.date)
            })?;
            for (shift, label) in &entry.shifts {
                if *shift == 0 {
                    return Err(RankError::invalid_value("shift number", shift));
                }
                label.parse::<Difficulty>()?;
            }
        }
        Ok(())
    }

    /// Build an in-memory source holding this pack under the given names
    pub fn to_memory_source(&self, tables: &TableNames) -> MemorySource {
        let mut source = MemorySource::new();
        for table in ReferenceTable::ALL {
            source.insert_table(tables.name_for(table), self.rows(table).to_vec());
        }
        for entry in &self.difficulty {
            for (shift, label) in &entry.shifts {
                source.insert_shift_label(&tables.difficulty, &entry.date, *shift, label);
            }
        }
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::resolve_difficulty;
    use crate::source::ReferenceSource;

    const PACK: &str = r#"{
        "marks": [{"percentile": 50.0, "easy": 150, "medium": 120, "hard": 100}],
        "math": [{"percentile": 50.0, "easy": 60}],
        "difficulty": [
            {"date": "04-05-2024", "shifts": {"1": "Easy", "2": "Hard"}},
            {"date": "05-05-2024", "shifts": {"3": "Medium"}}
        ]
    }"#;

    #[test]
    fn test_parse_pack_with_missing_sections() {
        let pack: ReferencePack = serde_json::from_str(PACK).unwrap();
        pack.validate().unwrap();
        assert!(pack.physics_chemistry.is_empty());
        assert_eq!(pack.max_shift(), Some(3));
        assert_eq!(pack.difficulty[0].shifts[&2], "Hard");
    }

    #[test]
    fn test_validate_rejects_bad_label() {
        let mut pack: ReferencePack = serde_json::from_str(PACK).unwrap();
        pack.difficulty[0].shifts.insert(4, "easy".into());
        assert!(matches!(
            pack.validate(),
            Err(RankError::InvalidDifficulty { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_iso_dates() {
        let mut pack: ReferencePack = serde_json::from_str(PACK).unwrap();
        pack.difficulty[0].date = "2024-05-04".into();
        assert!(matches!(pack.validate(), Err(RankError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_rejects_shift_zero() {
        let mut pack: ReferencePack = serde_json::from_str(PACK).unwrap();
        pack.difficulty[0].shifts.insert(0, "Easy".into());
        assert!(pack.validate().is_err());
    }

    #[test]
    fn test_to_memory_source() {
        let pack: ReferencePack = serde_json::from_str(PACK).unwrap();
        let tables = TableNames::default();
        let source = pack.to_memory_source(&tables);

        let date = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        assert_eq!(
            resolve_difficulty(&source, &tables.difficulty, date, 2).unwrap(),
            Difficulty::Hard
        );
        assert_eq!(
            source
                .reference_points(&tables.math, Difficulty::Hard)
                .unwrap()
                .len(),
            0
        );
    }
}
