//! Functional correspondence graph between positions of a repeated motif.
//!
//! Every domain position has exactly one outgoing edge; several positions may
//! point at the same target. The graph is ordered by position so iteration,
//! scoring and block reconstruction are deterministic.

use std::collections::BTreeMap;

use crate::alignment::AlignmentError;
use crate::refine::RefineError;

/// Integer position (residue index) in the aligned structure.
pub type Position = i64;

/// Partial function `x -> f(x)` over integer positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Correspondence {
    edges: BTreeMap<Position, Position>,
}

impl Correspondence {
    /// Empty correspondence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(x, f(x))` pairs.
    ///
    /// A position listed twice on the left would make the relation
    /// non-functional and is rejected.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, AlignmentError>
    where
        I: IntoIterator<Item = (Position, Position)>,
    {
        let mut edges = BTreeMap::new();
        for (from, to) in pairs {
            if edges.insert(from, to).is_some() {
                return Err(AlignmentError::DuplicatePosition { position: from });
            }
        }
        Ok(Self { edges })
    }

    pub(crate) fn from_edges(edges: BTreeMap<Position, Position>) -> Self {
        Self { edges }
    }

    /// Number of domain positions.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when the domain is empty.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns `true` when `x` has an outgoing edge.
    pub fn contains(&self, x: Position) -> bool {
        self.edges.contains_key(&x)
    }

    /// Image `f(x)`, if `x` is in the domain.
    #[inline]
    pub fn image(&self, x: Position) -> Option<Position> {
        self.edges.get(&x).copied()
    }

    /// Edges in ascending domain order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.edges.iter().map(|(&x, &y)| (x, y))
    }

    /// Domain positions in ascending order.
    pub fn domain(&self) -> impl Iterator<Item = Position> + '_ {
        self.edges.keys().copied()
    }

    /// Smallest and largest domain position.
    pub fn domain_bounds(&self) -> Option<(Position, Position)> {
        let min = self.edges.keys().next()?;
        let max = self.edges.keys().next_back()?;
        Some((*min, *max))
    }

    /// The `n`-fold image `f^n(x)`, or `None` when any step leaves the domain.
    ///
    /// `iterate(x, 0)` is `x` itself.
    pub fn iterate(&self, x: Position, n: usize) -> Option<Position> {
        let mut cur = x;
        for _ in 0..n {
            cur = self.image(cur)?;
        }
        Some(cur)
    }

    /// The `n`-fold composition `f^n`, restricted to positions where it is defined.
    pub fn power(&self, n: usize) -> BTreeMap<Position, Position> {
        self.edges
            .keys()
            .filter_map(|&x| self.iterate(x, n).map(|y| (x, y)))
            .collect()
    }

    /// Returns `true` when `f^k(x)` is defined and equals `x`.
    pub fn is_periodic(&self, x: Position, k: usize) -> bool {
        self.contains(x) && self.iterate(x, k) == Some(x)
    }

    /// Length of the cycle through `x`, searched up to `max_steps` edges.
    ///
    /// `None` when `x` is not on a cycle of at most `max_steps` edges.
    pub fn cycle_length(&self, x: Position, max_steps: usize) -> Option<usize> {
        let mut cur = x;
        for step in 1..=max_steps {
            cur = self.image(cur)?;
            if cur == x {
                return Some(step);
            }
        }
        None
    }

    /// Point the outgoing edge of `from` at `to`, returning the previous target.
    pub(crate) fn redirect(&mut self, from: Position, to: Position) -> Result<Position, RefineError> {
        match self.edges.get_mut(&from) {
            Some(target) => Ok(std::mem::replace(target, to)),
            None => Err(RefineError::MissingNode { position: from }),
        }
    }
}

impl FromIterator<(Position, Position)> for Correspondence {
    /// Collect pairs; later duplicates overwrite earlier ones.
    fn from_iter<T: IntoIterator<Item = (Position, Position)>>(iter: T) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_cycle() -> Correspondence {
        Correspondence::from_pairs([(0, 2), (2, 4), (4, 0), (1, 3), (3, 5), (5, 1)])
            .expect("functional input")
    }

    #[test]
    fn from_pairs_rejects_duplicate_domain_position() {
        let err = Correspondence::from_pairs([(0, 1), (1, 2), (0, 3)]).unwrap_err();
        assert_eq!(err, AlignmentError::DuplicatePosition { position: 0 });
    }

    #[test]
    fn iterate_stops_at_domain_boundary() {
        let m = Correspondence::from_pairs([(0, 1), (1, 7)]).unwrap();
        assert_eq!(m.iterate(0, 0), Some(0));
        assert_eq!(m.iterate(0, 2), Some(7));
        assert_eq!(m.iterate(0, 3), None);
        assert_eq!(m.iterate(9, 1), None);
    }

    #[test]
    fn power_keeps_only_defined_images() {
        let m = Correspondence::from_pairs([(0, 1), (1, 2), (2, 0), (5, 6)]).unwrap();
        let p3 = m.power(3);
        assert_eq!(p3.len(), 3);
        assert!(p3.iter().all(|(x, y)| x == y));
        assert!(!p3.contains_key(&5));
    }

    #[test]
    fn periodicity_and_cycle_length() {
        let m = three_cycle();
        assert!(m.domain().all(|x| m.is_periodic(x, 3)));
        assert!(m.domain().all(|x| !m.is_periodic(x, 2)));
        assert_eq!(m.cycle_length(1, 10), Some(3));
        assert_eq!(m.cycle_length(1, 2), None);
        assert_eq!(m.domain_bounds(), Some((0, 5)));
    }

    #[test]
    fn redirect_replaces_existing_edge_only() {
        let mut m = three_cycle();
        assert_eq!(m.redirect(4, 1).unwrap(), 0);
        assert_eq!(m.image(4), Some(1));
        assert_eq!(m.len(), 6);
        assert_eq!(
            m.redirect(42, 0).unwrap_err(),
            RefineError::MissingNode { position: 42 }
        );
    }
}
