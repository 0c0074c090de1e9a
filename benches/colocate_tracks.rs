//! Benchmarks for colocate_tracks (kd-tree build + nearest-neighbor scan)
//!
//! Run with:
//!   cargo bench --bench colocate_tracks
//!   cargo bench colocate_tracks -- colocate_tracks/match_same_epoch_10000
//!
//! The fixtures are deterministic; keep them outside the hot loops.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use overpass::colocation::kdtree::KdTree2;
use overpass::colocation::{colocate_tracks, ColocParams};
use overpass::constants::TrackTable;
use overpass::time::profile_epoch_from_elapsed;
use overpass::tracks::TrackRecord;

/// Deterministic records spread over a 10 x 10 degree box, all at one epoch
/// so pairs survive the temporal filter.
fn make_tracks(n: usize, seed: u64) -> TrackTable {
    let epoch = profile_epoch_from_elapsed(0.0);
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            TrackRecord::new(
                rng.random_range(-5.0..5.0),
                rng.random_range(40.0..50.0),
                epoch,
                0,
            )
        })
        .collect()
}

fn bench_colocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("colocate_tracks");

    let profile = make_tracks(1_000, 7);
    let params = ColocParams::default();

    for imager_size in [1_000usize, 10_000, 50_000] {
        let imager = make_tracks(imager_size, 13);
        group.bench_with_input(
            BenchmarkId::new("match_same_epoch", imager_size),
            &imager,
            |b, imager| {
                b.iter(|| {
                    let pairs =
                        colocate_tracks(black_box(&profile), black_box(imager), &params)
                            .expect("valid thresholds");
                    black_box(pairs)
                })
            },
        );
    }

    let points: Vec<_> = make_tracks(10_000, 13).iter().map(|r| r.point()).collect();
    group.bench_function("kdtree_build_10000", |b| {
        b.iter(|| {
            let tree = KdTree2::build(black_box(&points));
            black_box(tree.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_colocate);
criterion_main!(benches);
