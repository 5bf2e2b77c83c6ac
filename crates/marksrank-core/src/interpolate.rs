//! Percentile interpolation
//!
//! Given a raw score and the reference points of one table column, find the
//! nearest point at or above the score and the nearest point below it, then
//! place the score between them:
//!
//! - no point above or at the score: the table's top percentile applies
//! - no point below the score: the score is at the bottom of the table, 0
//! - both: `lower.percentile + (score - lower.score) / (upper.score - lower.score)`
//!
//! In the default [`InterpolationMode::Offset`] the fractional position is
//! added to the lower percentile as-is rather than scaled by the percentile
//! gap to the upper point. Published results depend on this exact formula.
//! [`InterpolationMode::Linear`] blends toward the upper percentile instead.
//!
//! A small jitter in `[0.01, 0.09999]` is then added, unless that would take
//! the result to 100 or beyond.

use std::fmt;
use std::str::FromStr;

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::reference::ReferencePoint;

/// Upper percentile bound that jitter may never reach
pub const PERCENTILE_CEILING: f64 = 100.0;

const JITTER_MIN: u32 = 1000;
const JITTER_MAX: u32 = 9999;
const JITTER_SCALE: f64 = 100_000.0;

/// How a score between two reference points is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMode {
    /// `lower.percentile + fraction`
    #[default]
    Offset,
    /// `lower.percentile + fraction * (upper.percentile - lower.percentile)`
    Linear,
}

impl FromStr for InterpolationMode {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "offset" => Ok(InterpolationMode::Offset),
            "linear" => Ok(InterpolationMode::Linear),
            other => Err(RankError::invalid_value("interpolation mode", other)),
        }
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationMode::Offset => write!(f, "offset"),
            InterpolationMode::Linear => write!(f, "linear"),
        }
    }
}

/// Source of the tie-breaking addend applied to interpolated percentiles
pub trait JitterSource {
    /// Next jitter value, normally in `[0.01, 0.09999]`
    fn draw(&mut self) -> f64;
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }
}

/// Jitter drawn from a pseudo-random generator
#[derive(Debug, Clone)]
pub struct RandomJitter<R> {
    rng: R,
}

impl<R: Rng> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomJitter<ThreadRng> {
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RandomJitter<StdRng> {
    /// Reproducible jitter sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> JitterSource for RandomJitter<R> {
    fn draw(&mut self) -> f64 {
        f64::from(self.rng.gen_range(JITTER_MIN..=JITTER_MAX)) / JITTER_SCALE
    }
}

/// Constant jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

/// No jitter at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn draw(&mut self) -> f64 {
        0.0
    }
}

/// Nearest point at or above `score`, and nearest point strictly below it
fn bracket(
    score: f64,
    points: &[ReferencePoint],
) -> (Option<ReferencePoint>, Option<ReferencePoint>) {
    let upper = points
        .iter()
        .filter(|p| p.score >= score)
        .min_by(|a, b| a.score.total_cmp(&b.score))
        .copied();
    let lower = points
        .iter()
        .filter(|p| p.score < score)
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .copied();
    (upper, lower)
}

/// Interpolated percentile before jitter
pub fn base_percentile(score: f64, points: &[ReferencePoint]) -> Result<f64> {
    base_percentile_with(InterpolationMode::Offset, score, points)
}

/// Interpolated percentile before jitter, using the given mode
pub fn base_percentile_with(
    mode: InterpolationMode,
    score: f64,
    points: &[ReferencePoint],
) -> Result<f64> {
    if points.is_empty() {
        return Err(RankError::empty_table("reference points"));
    }

    match bracket(score, points) {
        (None, None) | (Some(_), None) => Ok(0.0),
        (None, Some(lower)) => Ok(lower.percentile),
        (Some(upper), Some(lower)) => {
            let span = upper.score - lower.score;
            if span == 0.0 || !span.is_finite() {
                return Err(RankError::DegenerateRange { score });
            }
            let fraction = (score - lower.score) / span;
            Ok(match mode {
                InterpolationMode::Offset => fraction + lower.percentile,
                InterpolationMode::Linear => {
                    lower.percentile + fraction * (upper.percentile - lower.percentile)
                }
            })
        }
    }
}

/// Add one jitter draw to `base` unless it would reach the ceiling
pub fn apply_jitter<J: JitterSource + ?Sized>(base: f64, jitter: &mut J) -> f64 {
    let offset = jitter.draw();
    if base + offset < PERCENTILE_CEILING {
        base + offset
    } else {
        base
    }
}

/// Interpolated percentile for `score`, with jitter
pub fn interpolate<J: JitterSource + ?Sized>(
    score: f64,
    points: &[ReferencePoint],
    jitter: &mut J,
) -> Result<f64> {
    interpolate_with(InterpolationMode::Offset, score, points, jitter)
}

/// Interpolated percentile for `score` in the given mode, with jitter
pub fn interpolate_with<J: JitterSource + ?Sized>(
    mode: InterpolationMode,
    score: f64,
    points: &[ReferencePoint],
    jitter: &mut J,
) -> Result<f64> {
    let base = base_percentile_with(mode, score, points)?;
    Ok(apply_jitter(base, jitter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<ReferencePoint> {
        vec![ReferencePoint::new(60.0, 50.0), ReferencePoint::new(80.0, 75.0)]
    }

    #[test]
    fn test_between_points_adds_fraction_to_lower() {
        assert_eq!(base_percentile(70.0, &table()).unwrap(), 50.5);
    }

    #[test]
    fn test_exact_match_uses_next_lower_point() {
        // 80 is its own upper bound; the lower bound is 60
        assert_eq!(base_percentile(80.0, &table()).unwrap(), 51.0);
    }

    #[test]
    fn test_above_range_clamps_to_top() {
        assert_eq!(base_percentile(90.0, &table()).unwrap(), 75.0);
    }

    #[test]
    fn test_at_or_below_range_is_zero() {
        assert_eq!(base_percentile(40.0, &table()).unwrap(), 0.0);
        assert_eq!(base_percentile(60.0, &table()).unwrap(), 0.0);
    }

    #[test]
    fn test_unsorted_points() {
        let points = vec![
            ReferencePoint::new(90.0, 95.0),
            ReferencePoint::new(30.0, 10.0),
            ReferencePoint::new(70.0, 60.0),
            ReferencePoint::new(50.0, 40.0),
        ];
        assert_eq!(base_percentile(60.0, &points).unwrap(), 40.5);
    }

    #[test]
    fn test_empty_points_is_error() {
        assert!(matches!(
            base_percentile(10.0, &[]),
            Err(RankError::EmptyTable { .. })
        ));
    }

    #[test]
    fn test_non_finite_span_is_degenerate() {
        let points = vec![
            ReferencePoint::new(f64::NEG_INFINITY, 1.0),
            ReferencePoint::new(80.0, 75.0),
        ];
        assert!(matches!(
            base_percentile(70.0, &points),
            Err(RankError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_nan_scores_are_ignored() {
        let points = vec![ReferencePoint::new(f64::NAN, 99.0)];
        assert_eq!(base_percentile(50.0, &points).unwrap(), 0.0);
    }

    #[test]
    fn test_linear_mode_blends_toward_upper() {
        let points = table();
        assert_eq!(
            base_percentile_with(InterpolationMode::Linear, 70.0, &points).unwrap(),
            62.5
        );
        assert_eq!(
            base_percentile_with(InterpolationMode::Linear, 80.0, &points).unwrap(),
            75.0
        );
        // Edge cases do not depend on the mode
        assert_eq!(
            base_percentile_with(InterpolationMode::Linear, 90.0, &points).unwrap(),
            75.0
        );
        assert_eq!(
            base_percentile_with(InterpolationMode::Linear, 40.0, &points).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_interpolation_mode_parse() {
        assert_eq!(
            "Linear".parse::<InterpolationMode>().unwrap(),
            InterpolationMode::Linear
        );
        assert_eq!(InterpolationMode::default().to_string(), "offset");
        assert!("cubic".parse::<InterpolationMode>().is_err());
    }

    #[test]
    fn test_jitter_added_below_ceiling() {
        let value = apply_jitter(50.0, &mut FixedJitter(0.05));
        assert!((value - 50.05).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn test_jitter_skipped_at_ceiling() {
        assert_eq!(apply_jitter(99.97, &mut FixedJitter(0.05)), 99.97);
        assert_eq!(apply_jitter(100.0, &mut FixedJitter(0.01)), 100.0);
    }

    #[test]
    fn test_random_jitter_bounds() {
        let mut jitter = RandomJitter::seeded(7);
        for _ in 0..1000 {
            let j = jitter.draw();
            assert!((0.01..=0.09999).contains(&j), "jitter out of range: {j}");
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let mut a = RandomJitter::seeded(42);
        let mut b = RandomJitter::seeded(42);
        let first: Vec<f64> = (0..5).map(|_| a.draw()).collect();
        let second: Vec<f64> = (0..5).map(|_| b.draw()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_interpolate_with_random_jitter_range() {
        let mut jitter = RandomJitter::seeded(1);
        let value = interpolate(70.0, &table(), &mut jitter).unwrap();
        assert!(value > 50.5 && value < 50.6, "got {value}");
    }
}
