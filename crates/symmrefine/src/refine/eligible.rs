use crate::correspondence::{Correspondence, Position};

use super::score::{Score, ScoreTable};
use super::types::SymmetryOrder;

/// Returns `true` when `x` may be the `best` of the next edit.
///
/// Eligible iff all of:
/// 1. `score(x) > 0` (defined and not already periodic),
/// 2. `f^(k-1)(x)` is defined,
/// 3. `score(f^(k-1)(x)) > 0`, so the redirected edge never belongs to a
///    cycle that has already converged.
pub(super) fn is_eligible(
    x: Position,
    mapping: &Correspondence,
    scores: &ScoreTable,
    k: SymmetryOrder,
) -> bool {
    if !scores.get(x).is_positive() {
        return false;
    }
    match mapping.iterate(x, k.get() - 1) {
        Some(pivot) => scores.get(pivot).is_positive(),
        None => false,
    }
}

/// Eligible positions in ascending order.
pub fn select_eligible(
    mapping: &Correspondence,
    scores: &ScoreTable,
    k: SymmetryOrder,
) -> Vec<Position> {
    mapping
        .domain()
        .filter(|&x| is_eligible(x, mapping, scores, k))
        .collect()
}

/// Eligible position with the minimum score.
///
/// Scores of distinct positive-score positions never compare equal, so the
/// minimum is unique.
pub fn select_best(eligible: &[Position], scores: &ScoreTable) -> Option<(Position, Score)> {
    eligible
        .iter()
        .map(|&x| (x, scores.get(x)))
        .min_by(|a, b| a.1.cmp(&b.1))
}
