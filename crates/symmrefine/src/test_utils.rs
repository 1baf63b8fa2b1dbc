//! Shared builders for synthetic symmetric correspondences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::correspondence::{Correspondence, Position};

/// Perfect k-fold mapping over `k` consecutive repeats of `repeat_len`
/// positions: `x -> x + repeat_len`, wrapping the last repeat onto the first.
pub(crate) fn cyclic_repeats(k: usize, repeat_len: usize) -> Correspondence {
    let n = (k * repeat_len) as Position;
    let step = repeat_len as Position;
    (0..n).map(|x| (x, (x + step) % n)).collect()
}

/// Like [`cyclic_repeats`], with the wrap-around edges of the last repeat
/// shifted by `slip` positions (a register shift between first and last repeat).
pub(crate) fn slipped_repeats(k: usize, repeat_len: usize, slip: Position) -> Correspondence {
    let n = (k * repeat_len) as Position;
    let step = repeat_len as Position;
    (0..n)
        .map(|x| {
            let y = (x + step) % n;
            if x + step >= n {
                (x, (y + slip).rem_euclid(n))
            } else {
                (x, y)
            }
        })
        .collect()
}

/// Redirect `n_noisy` random edges of `mapping` by up to `max_shift` positions.
///
/// Deterministic for a given `seed`.
pub(crate) fn perturb(
    mapping: &Correspondence,
    n_noisy: usize,
    max_shift: Position,
    seed: u64,
) -> Correspondence {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges: Vec<(Position, Position)> = mapping.iter().collect();
    if edges.is_empty() {
        return Correspondence::new();
    }
    for _ in 0..n_noisy {
        let i = rng.gen_range(0..edges.len());
        let shift = rng.gen_range(-max_shift..=max_shift);
        edges[i].1 += shift;
    }
    edges.into_iter().collect()
}
