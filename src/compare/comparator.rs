use tracing::debug;

use crate::backend::BackendOutcome;

use super::types::{BackendErrors, ComparisonOutcome, Performance};

/// Compares a served-backend outcome against a reference-backend outcome.
///
/// Never fails: a failed backend, mismatched lengths and degenerate score
/// ranges all resolve to `score_similarity = 0` or a non-matching ranking.
pub fn compare(served: &BackendOutcome, reference: &BackendOutcome) -> ComparisonOutcome {
    let performance = Performance {
        served_time: served.elapsed().as_secs_f64(),
        reference_time: reference.elapsed().as_secs_f64(),
    };

    let (served_result, reference_result) = match (served.result(), reference.result()) {
        (Some(s), Some(r)) => (s, r),
        _ => {
            debug!(
                served_error = served.error(),
                reference_error = reference.error(),
                "Backend failure, skipping comparison"
            );
            return ComparisonOutcome {
                ranking_match: false,
                score_similarity: 0.0,
                served_ranking: Vec::new(),
                reference_ranking: Vec::new(),
                performance,
                errors: Some(BackendErrors {
                    served: served.error().map(str::to_string),
                    reference: reference.error().map(str::to_string),
                }),
            };
        }
    };

    let served_ranking = served_result.ranking();
    let reference_ranking = reference_result.ranking();
    let ranking_match = rankings_match(&served_ranking, &reference_ranking);

    let score_similarity = if !served_result.is_empty() && !reference_result.is_empty() {
        score_similarity(&served_result.scores(), &reference_result.scores())
    } else {
        0.0
    };

    debug!(
        ranking_match,
        score_similarity,
        served_len = served_result.len(),
        reference_len = reference_result.len(),
        "Compared rankings"
    );

    ComparisonOutcome {
        ranking_match,
        score_similarity,
        served_ranking: served_ranking.into_iter().map(str::to_string).collect(),
        reference_ranking: reference_ranking.into_iter().map(str::to_string).collect(),
        performance,
        errors: None,
    }
}

/// Element-wise equality of two document orderings.
pub fn rankings_match(a: &[&str], b: &[&str]) -> bool {
    a == b
}

/// Min-max normalizes `scores` into `[0, 1]`.
///
/// A constant sequence (max == min) maps to all zeros. Finite scores whose
/// range overflows `f64` are halved before dividing.
pub fn min_max_normalize(scores: &[f64]) -> Vec<f64> {
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range == 0.0 {
        return vec![0.0; scores.len()];
    }

    if range.is_finite() {
        return scores.iter().map(|s| (s - min) / range).collect();
    }

    let half_range = max / 2.0 - min / 2.0;
    scores
        .iter()
        .map(|s| (s / 2.0 - min / 2.0) / half_range)
        .collect()
}

/// `1 - mean |a_i - b_i|` over the normalized curves, compared by rank position.
///
/// Returns 0 when either side is empty, the lengths differ, or a score is not finite.
pub fn score_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    if a.iter().chain(b).any(|s| !s.is_finite()) {
        return 0.0;
    }

    let a_norm = min_max_normalize(a);
    let b_norm = min_max_normalize(b);

    let total: f64 = a_norm
        .iter()
        .zip(&b_norm)
        .map(|(x, y)| (x - y).abs())
        .sum();
    let mean_abs_diff = total / a_norm.len() as f64;

    if mean_abs_diff.is_nan() {
        return 0.0;
    }

    (1.0 - mean_abs_diff).clamp(0.0, 1.0)
}
