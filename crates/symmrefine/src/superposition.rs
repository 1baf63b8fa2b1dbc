//! Boundary to the external best-fit superposition routine.
//!
//! The crate never touches coordinates. A [`Superposer`] owns the coordinate
//! arrays of both structural copies and turns a blocked alignment into fit
//! quality metrics.

use crate::alignment::BlockedAlignment;

/// Error type returned by superposition backends.
pub type SuperpositionError = Box<dyn std::error::Error + Send + Sync>;

/// Fit quality reported by a superposition backend.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitMetrics {
    /// Number of aligned pairs used in the fit.
    pub n_aligned: usize,
    /// Root-mean-square deviation of the superposed pairs.
    pub rmsd: f64,
    /// Length-normalized structural similarity, if the backend computes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tm_score: Option<f64>,
}

/// Recompute a superposition from a blocked alignment.
pub trait Superposer {
    fn superpose(&self, alignment: &BlockedAlignment) -> Result<FitMetrics, SuperpositionError>;
}

impl<F> Superposer for F
where
    F: Fn(&BlockedAlignment) -> Result<FitMetrics, SuperpositionError>,
{
    fn superpose(&self, alignment: &BlockedAlignment) -> Result<FitMetrics, SuperpositionError> {
        self(alignment)
    }
}
