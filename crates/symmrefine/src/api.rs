//! High-level refinement API.
//!
//! [`SymmetryRefiner`] is the primary entry point. It wraps a
//! [`RefineConfig`] and provides convenience methods for refining a bare
//! mapping, a blocked alignment, or a blocked alignment followed by an
//! external superposition.

use std::path::Path;

use crate::alignment::{AlignmentError, BlockedAlignment};
use crate::correspondence::Correspondence;
use crate::refine::{
    refine_symmetry, Edit, RefineConfig, RefineError, RefineStats, Refinement, SymmetryOrder,
};
use crate::superposition::{FitMetrics, SuperpositionError, Superposer};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors from the alignment-level refinement entry points.
#[derive(Debug)]
pub enum RefineAlignmentError {
    /// The input alignment is not a functional mapping.
    Alignment(AlignmentError),
    /// The greedy refinement failed.
    Refine(RefineError),
    /// The superposition backend failed.
    Superposition(SuperpositionError),
}

impl std::fmt::Display for RefineAlignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alignment(e) => write!(f, "invalid alignment: {}", e),
            Self::Refine(e) => write!(f, "refinement failed: {}", e),
            Self::Superposition(e) => write!(f, "superposition failed: {}", e),
        }
    }
}

impl std::error::Error for RefineAlignmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Alignment(e) => Some(e),
            Self::Refine(e) => Some(e),
            Self::Superposition(e) => Some(e.as_ref()),
        }
    }
}

impl From<AlignmentError> for RefineAlignmentError {
    fn from(e: AlignmentError) -> Self {
        Self::Alignment(e)
    }
}

impl From<RefineError> for RefineAlignmentError {
    fn from(e: RefineError) -> Self {
        Self::Refine(e)
    }
}

// ── Result ─────────────────────────────────────────────────────────────────

/// Refinement result for one blocked alignment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlignmentRefinement {
    /// Symmetry order used for the run.
    pub order: SymmetryOrder,
    /// Alignment as supplied.
    pub input: BlockedAlignment,
    /// Exactly k-periodic alignment, reblocked.
    pub refined: BlockedAlignment,
    /// Run statistics.
    pub stats: RefineStats,
    /// Fit of the input alignment, when a superposer was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_input: Option<FitMetrics>,
    /// Fit of the refined alignment, when a superposer was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_refined: Option<FitMetrics>,
    /// Applied edits, when recording is enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<Edit>,
}

// ── Refiner ────────────────────────────────────────────────────────────────

/// Primary refinement interface.
///
/// Create once, refine many alignments. Each call works on its own copy of
/// the input mapping.
///
/// # Examples
///
/// ```
/// use symmrefine::{BlockedAlignment, SymmetryOrder, SymmetryRefiner};
///
/// // 0 -> 2 -> 4 -> 1: the 3-fold image of 0 drifted by one position.
/// let aln =
///     BlockedAlignment::single_block([(0, 2), (1, 3), (2, 4), (3, 5), (4, 1), (5, 0)]);
/// let k = SymmetryOrder::new(3).unwrap();
/// let out = SymmetryRefiner::new().refine_alignment(&aln, k).unwrap();
///
/// let refined = out.refined.to_correspondence().unwrap();
/// assert_eq!(refined.len(), 6);
/// assert!(refined.domain().all(|x| refined.is_periodic(x, 3)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymmetryRefiner {
    config: RefineConfig,
}

impl SymmetryRefiner {
    /// Create a refiner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: RefineConfig) -> Self {
        Self { config }
    }

    /// Load a JSON config file and create a refiner in one step.
    pub fn from_config_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(RefineConfig::from_json_file(path)?))
    }

    /// Access the current configuration.
    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut RefineConfig {
        &mut self.config
    }

    /// Refine a bare mapping.
    pub fn refine(
        &self,
        mapping: &Correspondence,
        k: SymmetryOrder,
    ) -> Result<Refinement, RefineError> {
        refine_symmetry(mapping.clone(), k, &self.config)
    }

    /// Refine a blocked alignment and reblock the result.
    pub fn refine_alignment(
        &self,
        alignment: &BlockedAlignment,
        k: SymmetryOrder,
    ) -> Result<AlignmentRefinement, RefineAlignmentError> {
        let mapping = alignment.to_correspondence()?;
        let Refinement {
            refined,
            stats,
            edits,
        } = refine_symmetry(mapping, k, &self.config)?;

        let refined = BlockedAlignment::from_correspondence(&refined);
        tracing::info!(
            k = k.get(),
            n_input = stats.n_input,
            n_retained = stats.n_retained,
            n_blocks = refined.block_count(),
            n_iterations = stats.n_iterations,
            "refined alignment",
        );
        Ok(AlignmentRefinement {
            order: k,
            input: alignment.clone(),
            refined,
            stats,
            fit_input: None,
            fit_refined: None,
            edits,
        })
    }

    /// Refine a blocked alignment and superpose both the input and the result.
    pub fn refine_and_superpose(
        &self,
        alignment: &BlockedAlignment,
        k: SymmetryOrder,
        superposer: &dyn Superposer,
    ) -> Result<AlignmentRefinement, RefineAlignmentError> {
        let mut out = self.refine_alignment(alignment, k)?;
        let fit_input = superposer
            .superpose(&out.input)
            .map_err(RefineAlignmentError::Superposition)?;
        let fit_refined = superposer
            .superpose(&out.refined)
            .map_err(RefineAlignmentError::Superposition)?;
        tracing::info!(
            rmsd_input = fit_input.rmsd,
            rmsd_refined = fit_refined.rmsd,
            "superposition recomputed",
        );
        out.fit_input = Some(fit_input);
        out.fit_refined = Some(fit_refined);
        Ok(out)
    }
}
