//! Reference table types
//!
//! A reference table maps a percentile level to the marks needed to reach it,
//! with one marks column per difficulty label. Lookups project one difficulty
//! column into a list of [`ReferencePoint`]s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::error::RankError;

/// One (score, percentile) pair from a reference table column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub score: f64,
    pub percentile: f64,
}

impl ReferencePoint {
    pub fn new(score: f64, percentile: f64) -> Self {
        Self { score, percentile }
    }
}

/// A full reference table row: one percentile and the marks for each difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub percentile: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard: Option<f64>,
}

impl ReferenceRow {
    /// Row with the same marks under every difficulty
    pub fn uniform(percentile: f64, score: f64) -> Self {
        Self {
            percentile,
            easy: Some(score),
            medium: Some(score),
            hard: Some(score),
        }
    }

    /// Marks recorded for the given difficulty column
    pub fn score_for(&self, difficulty: Difficulty) -> Option<f64> {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Project the row onto one difficulty column
    pub fn point_for(&self, difficulty: Difficulty) -> Option<ReferencePoint> {
        self.score_for(difficulty)
            .map(|score| ReferencePoint::new(score, self.percentile))
    }
}

/// The three logical score tables consulted during an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceTable {
    /// Summed marks across all subjects
    Aggregate,
    /// Mathematics marks
    Math,
    /// Physics and chemistry marks share one table
    PhysicsChemistry,
}

impl ReferenceTable {
    pub const ALL: [ReferenceTable; 3] = [
        ReferenceTable::Aggregate,
        ReferenceTable::Math,
        ReferenceTable::PhysicsChemistry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceTable::Aggregate => "aggregate",
            ReferenceTable::Math => "math",
            ReferenceTable::PhysicsChemistry => "physics-chemistry",
        }
    }
}

impl FromStr for ReferenceTable {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggregate" | "marks" => Ok(ReferenceTable::Aggregate),
            "math" => Ok(ReferenceTable::Math),
            "physics-chemistry" | "pc" | "physics" | "chemistry" => {
                Ok(ReferenceTable::PhysicsChemistry)
            }
            other => Err(RankError::invalid_value("reference table", other)),
        }
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
