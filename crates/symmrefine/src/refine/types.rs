use crate::correspondence::{Correspondence, Position};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that abort a refinement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineError {
    /// Symmetry order below 2.
    InvalidOrder {
        /// Rejected order.
        k: usize,
    },
    /// A (k-1)-chain left the domain while being followed.
    BrokenChain {
        /// Position the chain started from.
        start: Position,
        /// Number of edges followed before the chain broke.
        step: usize,
    },
    /// An edit targeted a position that has no outgoing edge.
    MissingNode {
        /// Position without an outgoing edge.
        position: Position,
    },
    /// The loop hit its iteration cap with candidates still eligible.
    NotConverged {
        /// Iterations executed before giving up.
        iterations: usize,
        /// Eligible positions left when the cap was hit.
        remaining_eligible: usize,
    },
}

impl std::fmt::Display for RefineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrder { k } => write!(f, "symmetry order must be at least 2, got {}", k),
            Self::BrokenChain { start, step } => {
                write!(f, "chain from position {} breaks after {} steps", start, step)
            }
            Self::MissingNode { position } => {
                write!(f, "position {} has no outgoing edge", position)
            }
            Self::NotConverged {
                iterations,
                remaining_eligible,
            } => write!(
                f,
                "refinement did not converge within {} iterations ({} candidates still eligible)",
                iterations, remaining_eligible
            ),
        }
    }
}

impl std::error::Error for RefineError {}

// ── Types ──────────────────────────────────────────────────────────────────

/// Symmetry order `k >= 2`, fixed for one refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SymmetryOrder(usize);

impl SymmetryOrder {
    /// Validate and wrap an order.
    pub fn new(k: usize) -> Result<Self, RefineError> {
        if k < 2 {
            return Err(RefineError::InvalidOrder { k });
        }
        Ok(Self(k))
    }

    /// The order as a plain integer.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for SymmetryOrder {
    type Error = RefineError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

impl From<SymmetryOrder> for usize {
    fn from(k: SymmetryOrder) -> Self {
        k.0
    }
}

impl std::fmt::Display for SymmetryOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// One graph-surgery edit: `mapping[pivot] = best`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edit {
    /// Zero-based iteration that performed the edit.
    pub iteration: usize,
    /// Eligible position with the minimum score.
    pub best: Position,
    /// `f^(k-1)(best)`, whose outgoing edge was redirected.
    pub pivot: Position,
    /// Target of `pivot` before the edit.
    pub previous_target: Position,
    /// Score of `best` when it was selected.
    pub best_score: f64,
}

/// Loop state after a single [`GreedyRefiner::step`](super::GreedyRefiner::step).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefineState {
    /// An edit was applied; more may follow.
    Running(Edit),
    /// The eligible set is empty.
    Done,
}

/// Monitoring potential: unbounded scores first, then the finite deviation sum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Potential {
    /// Positions whose k-fold image is undefined.
    pub n_unbounded: usize,
    /// Sum of `|x - f^k(x)|` over positions with a defined k-fold image.
    pub deviation_sum: u64,
}

/// Statistics produced by one refinement run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RefineStats {
    /// Domain size of the input mapping.
    pub n_input: usize,
    /// Positions that were already exactly periodic before any edit.
    pub n_initially_periodic: usize,
    /// Edits performed by the greedy loop.
    pub n_iterations: usize,
    /// Positions kept by the finalizer.
    pub n_retained: usize,
    /// Positions pruned because their k-fold image was undefined.
    pub n_pruned_unbounded: usize,
    /// Positions pruned because their k-fold image was defined but differed.
    pub n_pruned_positive: usize,
    /// Potential before the first edit.
    pub potential_initial: Potential,
    /// Potential when the loop stopped.
    pub potential_final: Potential,
    /// Edits after which the potential went up.
    pub n_potential_increases: usize,
}

impl RefineStats {
    /// Total number of pruned positions.
    pub fn n_pruned(&self) -> usize {
        self.n_pruned_unbounded + self.n_pruned_positive
    }
}

/// Outcome of a successful refinement run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Refinement {
    /// Exactly k-periodic subset of the refined mapping.
    pub refined: Correspondence,
    /// Run statistics.
    pub stats: RefineStats,
    /// Edits in execution order (only when `record_edits` is enabled).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<Edit>,
}
