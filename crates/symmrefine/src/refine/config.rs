use std::path::Path;

/// Configuration for the greedy symmetry refinement loop.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Iteration cap per domain position, used when `max_iters` is `None`.
    pub max_iters_per_element: usize,
    /// Absolute iteration cap. Overrides `max_iters_per_element`.
    pub max_iters: Option<usize>,
    /// Keep every applied edit in the refinement outcome.
    pub record_edits: bool,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iters_per_element: 2,
            max_iters: None,
            record_edits: false,
        }
    }
}

impl RefineConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Maximum number of edits for a mapping with `n_domain` positions.
    pub fn iteration_cap(&self, n_domain: usize) -> usize {
        self.max_iters
            .unwrap_or_else(|| self.max_iters_per_element.saturating_mul(n_domain))
            .max(1)
    }
}
