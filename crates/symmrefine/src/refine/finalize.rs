use std::collections::BTreeMap;

use crate::correspondence::Correspondence;

use super::score::ScoreTable;

/// Positions dropped by [`finalize`], by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneCounts {
    /// k-fold image undefined.
    pub n_unbounded: usize,
    /// k-fold image defined but different from the position.
    pub n_positive: usize,
}

/// Keep only positions whose score is exactly zero.
///
/// `scores` must be evaluated against `mapping`.
pub fn finalize(mapping: &Correspondence, scores: &ScoreTable) -> (Correspondence, PruneCounts) {
    let mut counts = PruneCounts::default();
    let mut kept = BTreeMap::new();
    for (x, y) in mapping.iter() {
        let score = scores.get(x);
        if score.is_zero() {
            kept.insert(x, y);
        } else if score.is_finite() {
            counts.n_positive += 1;
        } else {
            counts.n_unbounded += 1;
        }
    }
    (Correspondence::from_edges(kept), counts)
}
