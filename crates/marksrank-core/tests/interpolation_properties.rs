//! Property tests for interpolation invariants.
//!
//! 1. Scores at or below the table minimum map to 0
//! 2. Scores above the table maximum map to the top row's percentile
//! 3. Offset mode stays within one point of the lower percentile
//! 4. Linear mode stays between the bracketing percentiles
//! 5. Jitter never pushes a result to 100 and never lowers it

use proptest::prelude::*;

use marksrank_core::interpolate::{
    apply_jitter, base_percentile, base_percentile_with, interpolate, InterpolationMode,
    JitterSource, NoJitter, RandomJitter,
};
use marksrank_core::reference::ReferencePoint;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Reference points with distinct scores and percentiles rising with score
fn arb_table() -> impl Strategy<Value = Vec<ReferencePoint>> {
    prop::collection::btree_set(0u32..360, 2..24).prop_flat_map(|scores| {
        let len = scores.len();
        prop::collection::vec(0.0..99.0_f64, len).prop_map(move |mut percentiles| {
            percentiles.sort_by(|a, b| a.total_cmp(b));
            scores
                .iter()
                .zip(percentiles)
                .map(|(score, pct)| ReferencePoint::new(f64::from(*score), pct))
                .collect()
        })
    })
}

fn min_point(points: &[ReferencePoint]) -> ReferencePoint {
    *points
        .iter()
        .min_by(|a, b| a.score.total_cmp(&b.score))
        .unwrap()
}

fn max_point(points: &[ReferencePoint]) -> ReferencePoint {
    *points
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .unwrap()
}

// ── 1. Bottom of the table ───────────────────────────────────────────

proptest! {
    #[test]
    fn at_or_below_minimum_is_zero(points in arb_table(), below in 0.0..50.0_f64) {
        let min = min_point(&points);
        prop_assert_eq!(base_percentile(min.score - below, &points).unwrap(), 0.0);
    }
}

// ── 2. Top of the table ──────────────────────────────────────────────

proptest! {
    #[test]
    fn above_maximum_is_top_percentile(points in arb_table(), above in 0.001..100.0_f64) {
        let max = max_point(&points);
        let pct = interpolate(max.score + above, &points, &mut NoJitter).unwrap();
        prop_assert_eq!(pct, max.percentile);
    }
}

// ── 3. Offset mode ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn offset_within_one_of_lower(points in arb_table(), t in 0.0..1.0_f64) {
        let min = min_point(&points);
        let max = max_point(&points);
        let score = min.score + t * (max.score - min.score);

        let base = base_percentile(score, &points).unwrap();
        let lower = points
            .iter()
            .filter(|p| p.score < score)
            .max_by(|a, b| a.score.total_cmp(&b.score));

        match lower {
            None => prop_assert_eq!(base, 0.0),
            Some(lower) => {
                prop_assert!(base >= lower.percentile);
                prop_assert!(base <= lower.percentile + 1.0);
            }
        }
    }

    #[test]
    fn interpolation_ignores_row_order(points in arb_table(), t in 0.0..1.0_f64) {
        let min = min_point(&points);
        let max = max_point(&points);
        let score = min.score + t * (max.score - min.score);

        let mut reversed = points.clone();
        reversed.reverse();
        prop_assert_eq!(
            base_percentile(score, &points).unwrap(),
            base_percentile(score, &reversed).unwrap()
        );
    }
}

// ── 4. Linear mode ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn linear_between_bracketing_percentiles(points in arb_table(), t in 0.0..1.0_f64) {
        let min = min_point(&points);
        let max = max_point(&points);
        let score = min.score + t * (max.score - min.score);

        let base = base_percentile_with(InterpolationMode::Linear, score, &points).unwrap();
        if score > min.score {
            prop_assert!(base >= min.percentile - 1e-9);
            prop_assert!(base <= max.percentile + 1e-9);
        } else {
            prop_assert_eq!(base, 0.0);
        }
    }
}

// ── 5. Jitter ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn jitter_draws_in_range(seed in any::<u64>()) {
        let mut jitter = RandomJitter::seeded(seed);
        for _ in 0..16 {
            let draw = jitter.draw();
            prop_assert!((0.01..=0.09999).contains(&draw));
        }
    }

    #[test]
    fn jitter_stays_below_ceiling(seed in any::<u64>(), base in 0.0..100.0_f64) {
        let mut jitter = RandomJitter::seeded(seed);
        let result = apply_jitter(base, &mut jitter);
        prop_assert!(result >= base);
        prop_assert!(result < 100.0);
    }
}
