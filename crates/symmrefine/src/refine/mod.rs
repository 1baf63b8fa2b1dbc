//! Greedy refinement of a noisy correspondence into an exactly k-periodic one.
//!
//! ## Algorithm
//!
//! 1. **Score** — every domain position `x` gets `|x - f^k(x)|` plus a
//!    position-ordered fractional tie-breaker; undefined `f^k(x)` is unbounded.
//!
//! 2. **Select eligible** — `x` is eligible when `score(x) > 0`, `f^(k-1)(x)`
//!    is defined, and `score(f^(k-1)(x)) > 0`. Positions on a converged cycle
//!    score 0, so their edges are never touched.
//!
//! 3. **Edit** — take the eligible `best` with minimum score, follow `k-1`
//!    edges to `pivot` and set `f(pivot) = best`, closing a k-cycle through
//!    `best`.
//!
//! 4. **Repeat** — rescore and reselect from scratch until nothing is
//!    eligible, or fail with [`RefineError::NotConverged`] once the iteration
//!    cap is reached.
//!
//! 5. **Finalize** — drop every position whose final score is not exactly 0.

mod config;
mod eligible;
mod engine;
mod finalize;
mod score;
mod types;


pub use config::RefineConfig;
pub use eligible::{select_best, select_eligible};
pub use engine::GreedyRefiner;
pub use finalize::{finalize, PruneCounts};
pub use score::{Score, ScoreTable};
pub use types::{Edit, Potential, RefineError, RefineState, RefineStats, Refinement, SymmetryOrder};

use crate::correspondence::Correspondence;

/// Refine `mapping` so that every retained position is exactly k-periodic.
///
/// Consumes the mapping; the greedy loop edits it in place before pruning.
pub fn refine_symmetry(
    mapping: Correspondence,
    k: SymmetryOrder,
    config: &RefineConfig,
) -> Result<Refinement, RefineError> {
    GreedyRefiner::new(mapping, k, config).run()
}
