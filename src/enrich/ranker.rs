use crate::constants::COLOR_MATCH_BOOST;

use super::EnrichedResult;

/// Color-match boost, capped at 1.0. Non-finite scores pass through.
pub fn boost(similarity: f32) -> f32 {
    if !similarity.is_finite() {
        return similarity;
    }
    (similarity * COLOR_MATCH_BOOST).min(1.0)
}

/// Stable sort: color matches first, then descending similarity.
///
/// NaN similarities rank last within their group.
pub fn rank(results: &mut [EnrichedResult]) {
    results.sort_by(|a, b| {
        b.color_match
            .cmp(&a.color_match)
            .then_with(|| {
                sort_key(b.candidate.similarity).total_cmp(&sort_key(a.candidate.similarity))
            })
    });
}

fn sort_key(similarity: f32) -> f32 {
    if similarity.is_nan() {
        f32::NEG_INFINITY
    } else {
        similarity
    }
}
