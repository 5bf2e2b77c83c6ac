//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::interpolate::InterpolationMode;
use crate::reference::ReferenceTable;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Configuration format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default reference database path (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Fixed jitter seed for reproducible output (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter_seed: Option<u64>,

    /// Placement of scores between reference points
    #[serde(default)]
    pub interpolation: InterpolationMode,

    /// Physical table names
    #[serde(default)]
    pub tables: TableNames,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            database: None,
            jitter_seed: None,
            interpolation: InterpolationMode::default(),
            tables: TableNames::default(),
        }
    }
}

/// Names of the reference tables in the data store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    /// Aggregate marks vs percentile
    pub aggregate: String,
    /// Mathematics marks vs percentile
    pub math: String,
    /// Shared physics/chemistry marks vs percentile
    pub physics_chemistry: String,
    /// Difficulty label per date and shift
    pub difficulty: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            aggregate: "marks_vs_percentile".to_string(),
            math: "math_marks_vs_percentile".to_string(),
            physics_chemistry: "pc_marks_vs_percentile".to_string(),
            difficulty: "hb_difficulty_of_exam".to_string(),
        }
    }
}

impl TableNames {
    /// Physical name of a logical score table
    pub fn name_for(&self, table: ReferenceTable) -> &str {
        match table {
            ReferenceTable::Aggregate => &self.aggregate,
            ReferenceTable::Math => &self.math,
            ReferenceTable::PhysicsChemistry => &self.physics_chemistry,
        }
    }

    /// Every configured table name, score tables first
    pub fn all(&self) -> [&str; 4] {
        [
            &self.aggregate,
            &self.math,
            &self.physics_chemistry,
            &self.difficulty,
        ]
    }
}

fn default_version() -> u32 {
    CONFIG_FORMAT_VERSION
}
