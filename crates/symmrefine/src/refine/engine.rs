use crate::correspondence::{Correspondence, Position};

use super::config::RefineConfig;
use super::eligible::{select_best, select_eligible};
use super::finalize::finalize;
use super::score::ScoreTable;
use super::types::{
    Edit, Potential, RefineError, RefineState, RefineStats, Refinement, SymmetryOrder,
};

/// Greedy fixed-point loop over one owned mapping.
///
/// Scores and the eligible set are recomputed from scratch after every edit.
pub struct GreedyRefiner {
    mapping: Correspondence,
    order: SymmetryOrder,
    scores: ScoreTable,
    eligible: Vec<Position>,
    potential: Potential,
    iteration_cap: usize,
    record_edits: bool,
    edits: Vec<Edit>,
    stats: RefineStats,
}

impl GreedyRefiner {
    /// Take ownership of `mapping` and score it under `order`.
    pub fn new(mapping: Correspondence, order: SymmetryOrder, config: &RefineConfig) -> Self {
        let scores = ScoreTable::evaluate(&mapping, order);
        let eligible = select_eligible(&mapping, &scores, order);
        let potential = scores.potential();
        let stats = RefineStats {
            n_input: mapping.len(),
            n_initially_periodic: scores.n_periodic(),
            potential_initial: potential,
            potential_final: potential,
            ..RefineStats::default()
        };
        Self {
            iteration_cap: config.iteration_cap(mapping.len()),
            record_edits: config.record_edits,
            mapping,
            order,
            scores,
            eligible,
            potential,
            edits: Vec::new(),
            stats,
        }
    }

    #[inline]
    pub fn mapping(&self) -> &Correspondence {
        &self.mapping
    }

    #[inline]
    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Positions eligible for the next edit, ascending.
    #[inline]
    pub fn eligible(&self) -> &[Position] {
        &self.eligible
    }

    #[inline]
    pub fn order(&self) -> SymmetryOrder {
        self.order
    }

    #[inline]
    pub fn stats(&self) -> &RefineStats {
        &self.stats
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.eligible.is_empty()
    }

    /// Apply one edit, or report [`RefineState::Done`] when nothing is eligible.
    pub fn step(&mut self) -> Result<RefineState, RefineError> {
        let Some((best, best_score)) = select_best(&self.eligible, &self.scores) else {
            return Ok(RefineState::Done);
        };

        if self.stats.n_iterations >= self.iteration_cap {
            tracing::warn!(
                iterations = self.stats.n_iterations,
                remaining_eligible = self.eligible.len(),
                "symmetry refinement hit its iteration cap",
            );
            return Err(RefineError::NotConverged {
                iterations: self.stats.n_iterations,
                remaining_eligible: self.eligible.len(),
            });
        }

        let pivot = follow_chain(&self.mapping, best, self.order.get() - 1)?;
        let previous_target = self.mapping.redirect(pivot, best)?;
        let edit = Edit {
            iteration: self.stats.n_iterations,
            best,
            pivot,
            previous_target,
            best_score: best_score.value(),
        };
        tracing::trace!(
            iteration = edit.iteration,
            best,
            pivot,
            previous_target,
            score = edit.best_score,
            "redirected pivot edge",
        );

        self.stats.n_iterations += 1;
        if self.record_edits {
            self.edits.push(edit);
        }
        self.rescore();
        Ok(RefineState::Running(edit))
    }

    /// Loop until nothing is eligible, then prune non-periodic positions.
    pub fn run(mut self) -> Result<Refinement, RefineError> {
        tracing::debug!(
            n_domain = self.mapping.len(),
            k = self.order.get(),
            n_eligible = self.eligible.len(),
            n_periodic = self.stats.n_initially_periodic,
            "symmetry refinement: starting greedy loop",
        );
        while let RefineState::Running(_) = self.step()? {}
        Ok(self.finish())
    }

    fn rescore(&mut self) {
        self.scores = ScoreTable::evaluate(&self.mapping, self.order);
        self.eligible = select_eligible(&self.mapping, &self.scores, self.order);

        let potential = self.scores.potential();
        if potential > self.potential {
            self.stats.n_potential_increases += 1;
            tracing::debug!(
                iteration = self.stats.n_iterations,
                before = ?self.potential,
                after = ?potential,
                "refinement potential increased",
            );
        }
        self.potential = potential;
        self.stats.potential_final = potential;
    }

    fn finish(self) -> Refinement {
        let Self {
            mapping,
            scores,
            edits,
            mut stats,
            ..
        } = self;
        let (refined, pruned) = finalize(&mapping, &scores);
        stats.n_retained = refined.len();
        stats.n_pruned_unbounded = pruned.n_unbounded;
        stats.n_pruned_positive = pruned.n_positive;

        tracing::debug!(
            n_iterations = stats.n_iterations,
            n_retained = stats.n_retained,
            n_pruned = stats.n_pruned(),
            n_potential_increases = stats.n_potential_increases,
            "symmetry refinement complete",
        );
        Refinement {
            refined,
            stats,
            edits,
        }
    }
}

/// `f^steps(start)`, failing on the first missing edge.
fn follow_chain(
    mapping: &Correspondence,
    start: Position,
    steps: usize,
) -> Result<Position, RefineError> {
    let mut cur = start;
    for step in 0..steps {
        cur = mapping
            .image(cur)
            .ok_or(RefineError::BrokenChain { start, step })?;
    }
    Ok(cur)
}
