//! Per-position deviation score under k-fold application of the mapping.
//!
//! `score(x) = |x - f^k(x)| + (x - min) / (1 + max - min)` where `min`/`max`
//! are the current domain bounds. The fractional part only applies to
//! non-zero deviations, so exactly periodic points score exactly 0. Scores
//! are compared on the integer pair `(deviation, x - min)`; the real value is
//! only reported.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::correspondence::{Correspondence, Position};

use super::types::{Potential, SymmetryOrder};

/// Deviation of one position from exact k-periodicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// `f^k(x)` is defined.
    Finite {
        /// `|x - f^k(x)|`.
        deviation: u64,
        /// `x - min_domain` when `deviation > 0`, else 0.
        rank: u64,
        /// `1 + max_domain - min_domain`.
        span: u64,
    },
    /// `f^k(x)` is undefined.
    Unbounded,
}

impl Score {
    fn from_image(x: Position, image: Option<Position>, min: Position, max: Position) -> Self {
        let Some(y) = image else {
            return Self::Unbounded;
        };
        let deviation = x.abs_diff(y);
        let rank = if deviation > 0 { x.abs_diff(min) } else { 0 };
        Self::Finite {
            deviation,
            rank,
            span: max.abs_diff(min).saturating_add(1),
        }
    }

    /// Real-valued score; `+inf` when unbounded.
    pub fn value(self) -> f64 {
        match self {
            Self::Finite {
                deviation,
                rank,
                span,
            } => deviation as f64 + rank as f64 / span as f64,
            Self::Unbounded => f64::INFINITY,
        }
    }

    /// Integer deviation `|x - f^k(x)|`, if defined.
    pub fn deviation(self) -> Option<u64> {
        match self {
            Self::Finite { deviation, .. } => Some(deviation),
            Self::Unbounded => None,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        matches!(self, Self::Finite { .. })
    }

    /// Exactly periodic: defined and zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        matches!(self, Self::Finite { deviation: 0, .. })
    }

    /// Defined and strictly positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Finite { deviation, .. } if deviation > 0)
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unbounded, Self::Unbounded) => Ordering::Equal,
            (Self::Unbounded, Self::Finite { .. }) => Ordering::Greater,
            (Self::Finite { .. }, Self::Unbounded) => Ordering::Less,
            (
                Self::Finite {
                    deviation: da,
                    rank: ra,
                    span: sa,
                },
                Self::Finite {
                    deviation: db,
                    rank: rb,
                    span: sb,
                },
            ) => da.cmp(db).then(ra.cmp(rb)).then(sa.cmp(sb)),
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite { .. } => write!(f, "{:.4}", self.value()),
            Self::Unbounded => write!(f, "inf"),
        }
    }
}

/// Scores for every domain position of one mapping snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    scores: BTreeMap<Position, Score>,
}

impl ScoreTable {
    /// Score every domain position of `mapping` under order `k`.
    pub fn evaluate(mapping: &Correspondence, k: SymmetryOrder) -> Self {
        let Some((min, max)) = mapping.domain_bounds() else {
            return Self::default();
        };
        let scores = mapping
            .domain()
            .map(|x| (x, Score::from_image(x, mapping.iterate(x, k.get()), min, max)))
            .collect();
        Self { scores }
    }

    /// Score of `x`; positions outside the domain are unbounded.
    #[inline]
    pub fn get(&self, x: Position) -> Score {
        self.scores.get(&x).copied().unwrap_or(Score::Unbounded)
    }

    /// Scores in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Score)> + '_ {
        self.scores.iter().map(|(&x, &s)| (x, s))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of exactly periodic positions.
    pub fn n_periodic(&self) -> usize {
        self.scores.values().filter(|s| s.is_zero()).count()
    }

    pub fn potential(&self) -> Potential {
        self.scores
            .values()
            .fold(Potential::default(), |mut acc, s| {
                match s.deviation() {
                    Some(d) => acc.deviation_sum = acc.deviation_sum.saturating_add(d),
                    None => acc.n_unbounded += 1,
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(k: usize) -> SymmetryOrder {
        SymmetryOrder::new(k).unwrap()
    }

    #[test]
    fn perfect_three_fold_mapping_scores_zero_everywhere() {
        let m = Correspondence::from_pairs([(0, 2), (2, 4), (4, 0), (1, 3), (3, 5), (5, 1)])
            .unwrap();
        let table = ScoreTable::evaluate(&m, order(3));
        assert_eq!(table.len(), 6);
        assert!(table.iter().all(|(_, s)| s.is_zero() && s.value() == 0.0));
        assert_eq!(table.n_periodic(), 6);
        assert_eq!(table.potential(), Potential::default());
    }

    #[test]
    fn score_lies_in_unit_interval_above_deviation() {
        // 0 -> 1 -> 2 -> 4 -> 5 -> 9 -> 10 -> 11 -> 12
        let m = Correspondence::from_pairs([
            (0, 1),
            (1, 2),
            (2, 4),
            (4, 5),
            (5, 9),
            (9, 10),
            (10, 11),
            (11, 12),
            (12, 0),
        ])
        .unwrap();
        let table = ScoreTable::evaluate(&m, order(3));
        for (x, s) in table.iter() {
            let y = m.iterate(x, 3).expect("defined k-fold image");
            let dev = x.abs_diff(y) as f64;
            assert!(s.value() >= dev, "score({x}) = {} < {dev}", s.value());
            assert!(s.value() < dev + 1.0, "score({x}) = {} >= {dev} + 1", s.value());
        }
    }

    #[test]
    fn undefined_image_is_unbounded_and_sorts_last() {
        let m = Correspondence::from_pairs([(0, 1), (1, 2), (2, 30)]).unwrap();
        let table = ScoreTable::evaluate(&m, order(2));
        assert_eq!(table.get(0), Score::Finite { deviation: 2, rank: 0, span: 3 });
        // f^2(1) = 30 leaves the domain but is still defined.
        assert_eq!(table.get(1), Score::Finite { deviation: 29, rank: 1, span: 3 });
        assert_eq!(table.get(2), Score::Unbounded);
        assert_eq!(table.get(99), Score::Unbounded);
        assert!(table.get(1) < table.get(2));
        assert!(table.get(2).value().is_infinite());
        assert_eq!(
            table.potential(),
            Potential {
                n_unbounded: 1,
                deviation_sum: 31
            }
        );
    }

    #[test]
    fn equal_deviations_break_ties_towards_lower_position() {
        // 0 -> 10 -> 1 and 5 -> 15 -> 6: both have |x - f^2(x)| = 1.
        let m = Correspondence::from_pairs([(0, 10), (10, 1), (5, 15), (15, 6), (1, 0), (6, 5)])
            .unwrap();
        let table = ScoreTable::evaluate(&m, order(2));
        assert_eq!(table.get(0).deviation(), Some(1));
        assert_eq!(table.get(5).deviation(), Some(1));
        assert!(table.get(0) < table.get(5));
        assert!(table.get(0).value() < table.get(5).value());
    }

    #[test]
    fn empty_mapping_has_empty_table() {
        let table = ScoreTable::evaluate(&Correspondence::new(), order(4));
        assert!(table.is_empty());
        assert_eq!(table.potential(), Potential::default());
    }
}
