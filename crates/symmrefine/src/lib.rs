//! symmrefine — exact k-fold refinement of internal-symmetry correspondences.
//!
//! An upstream symmetry detector aligns a structure against itself and
//! estimates a symmetry order `k`. Its alignment is only approximately
//! k-fold symmetric. This crate edits the alignment so that following it `k`
//! times returns every retained position to itself, which is what an exact
//! superposition of the symmetric repeats needs.
//!
//! The stages are:
//!
//! 1. **Adapt** – blocked two-row alignment → functional [`Correspondence`].
//! 2. **Refine** – greedy graph surgery until no position is eligible
//!    ([`refine_symmetry`], [`GreedyRefiner`]).
//! 3. **Finalize** – drop positions that are not exactly k-periodic.
//! 4. **Reblock** – refined mapping → [`BlockedAlignment`] for an external
//!    [`Superposer`].
//!
//! # Public API
//! - [`SymmetryRefiner`] and [`SymmetryOrder`] as primary entry points
//! - [`RefineConfig`] for tuning the iteration cap and edit recording
//! - [`GreedyRefiner`] for stepping through edits one at a time

mod alignment;
mod api;
mod correspondence;
mod refine;
mod superposition;

#[cfg(test)]
pub(crate) mod test_utils;

pub use alignment::{AlignedBlock, AlignmentError, BlockedAlignment};
pub use api::{AlignmentRefinement, RefineAlignmentError, SymmetryRefiner};
pub use correspondence::{Correspondence, Position};
pub use refine::{
    finalize, refine_symmetry, select_best, select_eligible, Edit, GreedyRefiner, Potential,
    PruneCounts, RefineConfig, RefineError, RefineState, RefineStats, Refinement, Score,
    ScoreTable, SymmetryOrder,
};
pub use superposition::{FitMetrics, SuperpositionError, Superposer};
