//! Aggregate score evaluation
//!
//! One evaluation resolves the shift's difficulty once and then runs four
//! interpolations against it: the summed marks against the aggregate table,
//! mathematics against the math table, and physics and chemistry against the
//! shared physics/chemistry table. Any failure aborts the whole evaluation.

use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TableNames;
use crate::difficulty::{parse_exam_date, resolve_difficulty, Difficulty};
use crate::error::{RankError, Result};
use crate::interpolate::{interpolate_with, InterpolationMode, JitterSource};
use crate::reference::ReferenceTable;
use crate::source::ReferenceSource;
use crate::{bail_invalid, trace_time};

/// Raw subject scores of one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub math: f64,
    pub physics: f64,
    pub chemistry: f64,
}

impl ScoreInput {
    pub fn new(math: f64, physics: f64, chemistry: f64) -> Self {
        Self {
            math,
            physics,
            chemistry,
        }
    }

    /// Sum of the three subject scores
    pub fn aggregate(&self) -> f64 {
        self.math + self.physics + self.chemistry
    }

    /// Every score must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (subject, score) in [
            ("math score", self.math),
            ("physics score", self.physics),
            ("chemistry score", self.chemistry),
        ] {
            if !score.is_finite() || score < 0.0 {
                bail_invalid!(subject, score);
            }
        }
        Ok(())
    }
}

/// Inbound request shape: three marks, an ISO date and a shift number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub math_marks: f64,
    pub physics_marks: f64,
    pub chemistry_marks: f64,
    pub exam_date: String,
    pub shift: u32,
}

impl EvaluationRequest {
    pub fn scores(&self) -> ScoreInput {
        ScoreInput::new(self.math_marks, self.physics_marks, self.chemistry_marks)
    }
}

/// Estimated percentiles for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileResult {
    pub overall: f64,
    pub math: f64,
    pub physics: f64,
    pub chemistry: f64,
    pub aggregate_score: f64,
}

/// Evaluates candidates against one reference source
pub struct Evaluator<S, J> {
    source: S,
    tables: TableNames,
    jitter: J,
    mode: InterpolationMode,
}

impl<S: ReferenceSource, J: JitterSource> Evaluator<S, J> {
    pub fn new(source: S, tables: TableNames, jitter: J) -> Self {
        Self {
            source,
            tables,
            jitter,
            mode: InterpolationMode::default(),
        }
    }

    /// Use a different interpolation mode
    pub fn with_mode(mut self, mode: InterpolationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Difficulty label for a date and shift
    pub fn difficulty(&self, exam_date: NaiveDate, shift: u32) -> Result<Difficulty> {
        resolve_difficulty(&self.source, &self.tables.difficulty, exam_date, shift)
    }

    /// Percentile of one score in one logical table
    pub fn percentile(
        &mut self,
        table: ReferenceTable,
        difficulty: Difficulty,
        score: f64,
    ) -> Result<f64> {
        let name = self.tables.name_for(table).to_string();
        let points = self.source.reference_points(&name, difficulty)?;
        if points.is_empty() {
            return Err(RankError::empty_table(name));
        }
        interpolate_with(self.mode, score, &points, &mut self.jitter)
    }

    /// Full evaluation: overall, math, physics and chemistry percentiles
    pub fn evaluate(
        &mut self,
        input: ScoreInput,
        exam_date: NaiveDate,
        shift: u32,
    ) -> Result<PercentileResult> {
        let start = Instant::now();
        input.validate()?;

        let difficulty = self.difficulty(exam_date, shift)?;
        let aggregate_score = input.aggregate();

        let overall = self.percentile(ReferenceTable::Aggregate, difficulty, aggregate_score)?;
        let math = self.percentile(ReferenceTable::Math, difficulty, input.math)?;
        let [physics, chemistry] =
            self.shared_percentiles(difficulty, [input.physics, input.chemistry])?;

        trace_time!(start, "evaluate");
        debug!(
            %difficulty,
            aggregate_score,
            overall,
            math,
            physics,
            chemistry,
            "evaluate"
        );

        Ok(PercentileResult {
            overall,
            math,
            physics,
            chemistry,
            aggregate_score,
        })
    }

    /// Parse the request's date, then evaluate
    pub fn evaluate_request(&mut self, request: &EvaluationRequest) -> Result<PercentileResult> {
        let exam_date = parse_exam_date(&request.exam_date)?;
        self.evaluate(request.scores(), exam_date, request.shift)
    }

    /// Physics and chemistry read the shared table once
    fn shared_percentiles(&mut self, difficulty: Difficulty, scores: [f64; 2]) -> Result<[f64; 2]> {
        let name = self.tables.physics_chemistry.clone();
        let points = self.source.reference_points(&name, difficulty)?;
        if points.is_empty() {
            return Err(RankError::empty_table(name));
        }

        let mut out = [0.0; 2];
        for (slot, score) in out.iter_mut().zip(scores) {
            *slot = interpolate_with(self.mode, score, &points, &mut self.jitter)?;
        }
        Ok(out)
    }
}

/// Evaluate one inbound request against a borrowed source
pub fn calculate_percentile<S, J>(
    source: &S,
    tables: &TableNames,
    jitter: J,
    request: &EvaluationRequest,
) -> Result<PercentileResult>
where
    S: ReferenceSource + ?Sized,
    J: JitterSource,
{
    Evaluator::new(source, tables.clone(), jitter).evaluate_request(request)
}

/// Percentile for a free-form difficulty label.
///
/// A label outside `Easy`/`Medium`/`Hard` yields 0 without reading the
/// source.
pub fn percentile_for_label<S, J>(
    source: &S,
    table: &str,
    label: &str,
    score: f64,
    mode: InterpolationMode,
    jitter: &mut J,
) -> Result<f64>
where
    S: ReferenceSource + ?Sized,
    J: JitterSource + ?Sized,
{
    let Ok(difficulty) = label.parse::<Difficulty>() else {
        debug!(label, "percentile_for_label: invalid difficulty, returning 0");
        return Ok(0.0);
    };

    let points = source.reference_points(table, difficulty)?;
    if points.is_empty() {
        return Err(RankError::empty_table(table));
    }
    interpolate_with(mode, score, &points, jitter)
}
