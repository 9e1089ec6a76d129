//! Criterion micro-benchmarks for arena growth and typed views.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use grid64_arena::{Arena, ArenaConfig, Region};

const GRID_BYTES: usize = 768 * 1024 * 8;

/// Benchmark: grow an empty arena to the reference grid size in one step.
fn bench_arena_grow(c: &mut Criterion) {
    c.bench_function("arena_grow_6mb", |b| {
        b.iter_batched(
            || Arena::new(ArenaConfig::default()).unwrap(),
            |mut arena| {
                black_box(arena.ensure_capacity(GRID_BYTES).unwrap());
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: amortized growth through many small requests.
fn bench_arena_incremental_growth(c: &mut Criterion) {
    c.bench_function("arena_incremental_growth_1000", |b| {
        b.iter(|| {
            let mut arena = Arena::new(ArenaConfig::default()).unwrap();
            for i in 1..=1000 {
                arena.ensure_capacity(i * 4096).unwrap();
            }
            black_box(arena.size());
        });
    });
}

/// Benchmark: obtain an f64 view and fill it.
fn bench_arena_f64_fill(c: &mut Criterion) {
    let mut arena = Arena::new(ArenaConfig::default()).unwrap();
    arena.ensure_capacity(GRID_BYTES).unwrap();
    let region = Region::new(0, GRID_BYTES);

    c.bench_function("arena_f64_fill_6mb", |b| {
        b.iter(|| {
            arena.f64s_mut(region).unwrap().fill(black_box(4.2));
        });
    });
}

/// Benchmark: overlapping relocation of a 6MB region by one page.
fn bench_arena_copy_within(c: &mut Criterion) {
    let mut arena = Arena::new(ArenaConfig::default()).unwrap();
    arena.ensure_capacity(GRID_BYTES + 65_536).unwrap();
    let region = Region::new(0, GRID_BYTES);

    c.bench_function("arena_copy_within_6mb", |b| {
        b.iter(|| {
            arena.copy_within(region, 65_536).unwrap();
            black_box(arena.bytes()[65_536]);
        });
    });
}

criterion_group!(
    benches,
    bench_arena_grow,
    bench_arena_incremental_growth,
    bench_arena_f64_fill,
    bench_arena_copy_within
);
criterion_main!(benches);
