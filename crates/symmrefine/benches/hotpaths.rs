use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use symmrefine::{
    refine_symmetry, BlockedAlignment, Correspondence, Position, RefineConfig, ScoreTable,
    SymmetryOrder,
};

/// `k` repeats of `repeat_len` positions with `n_noisy` edges shifted by up to 3.
fn make_noisy_fixture(k: usize, repeat_len: usize, n_noisy: usize, seed: u64) -> Correspondence {
    let n = (k * repeat_len) as Position;
    let step = repeat_len as Position;
    let mut edges: Vec<(Position, Position)> = (0..n).map(|x| (x, (x + step) % n)).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..n_noisy {
        let i = rng.gen_range(0..edges.len());
        edges[i].1 += rng.gen_range(-3..=3);
    }
    edges.into_iter().collect()
}

fn order(k: usize) -> SymmetryOrder {
    match SymmetryOrder::new(k) {
        Ok(k) => k,
        Err(e) => panic!("{}", e),
    }
}

fn bench_scores(c: &mut Criterion) {
    let mapping = make_noisy_fixture(3, 200, 60, 7);
    let k = order(3);

    c.bench_function("score_table_600", |b| {
        b.iter(|| {
            let scores = ScoreTable::evaluate(black_box(&mapping), k);
            black_box(scores.potential())
        })
    });
}

fn bench_refine(c: &mut Criterion) {
    let cfg = RefineConfig::default();
    let small = make_noisy_fixture(3, 40, 20, 11);
    let large = make_noisy_fixture(4, 150, 120, 13);

    c.bench_function("refine_c3_120", |b| {
        b.iter(|| {
            let out = refine_symmetry(black_box(small.clone()), order(3), &cfg);
            black_box(out.map(|r| r.stats.n_retained).unwrap_or(0))
        })
    });

    c.bench_function("refine_c4_600", |b| {
        b.iter(|| {
            let out = refine_symmetry(black_box(large.clone()), order(4), &cfg);
            black_box(out.map(|r| r.stats.n_retained).unwrap_or(0))
        })
    });
}

fn bench_reblock(c: &mut Criterion) {
    let mapping = make_noisy_fixture(6, 100, 0, 17);

    c.bench_function("reblock_600", |b| {
        b.iter(|| {
            let aln = BlockedAlignment::from_correspondence(black_box(&mapping));
            black_box(aln.block_count())
        })
    });
}

criterion_group!(hotpaths, bench_scores, bench_refine, bench_reblock);
criterion_main!(hotpaths);
