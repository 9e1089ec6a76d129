//! Criterion benchmarks for the engine's public cycle.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use grid64_bench::{prepared_engine, reference_profile, small_profile};
use grid64_core::Dims;
use grid64_engine::{Engine, EngineConfig};

/// Benchmark: first resize of a fresh engine to the reference grid.
fn bench_resize_cold(c: &mut Criterion) {
    let profile = reference_profile();
    c.bench_function("resize_cold_768x1024", |b| {
        b.iter_batched(
            || Engine::new(EngineConfig::default()).unwrap(),
            |mut engine| {
                black_box(engine.resize(profile.dims, profile.fill).unwrap());
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: grow a populated grid by one row and one column.
fn bench_resize_preserving(c: &mut Criterion) {
    let profile = small_profile();
    c.bench_function("resize_preserving_64x64", |b| {
        b.iter_batched(
            || prepared_engine(profile, 1),
            |mut engine| {
                black_box(engine.resize(Dims::new(65, 65), 0.0).unwrap());
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: sum over 786K cells.
fn bench_sum(c: &mut Criterion) {
    let engine = prepared_engine(reference_profile(), 7);
    c.bench_function("sum_768x1024", |b| {
        b.iter(|| black_box(engine.sum()));
    });
}

/// Benchmark: cold vs warm serialize of the reference grid.
fn bench_serialize(c: &mut Criterion) {
    let mut engine = prepared_engine(reference_profile(), 11);
    engine.set_metadata("units", "kelvin");

    c.bench_function("serialize_init_768x1024", |b| {
        b.iter(|| black_box(engine.serialize_init().unwrap()));
    });
    c.bench_function("serialize_warm_768x1024", |b| {
        b.iter(|| black_box(engine.serialize().unwrap()));
    });
}

/// Benchmark: full serialize -> clear -> decode cycle.
fn bench_roundtrip(c: &mut Criterion) {
    let profile = reference_profile();
    let mut engine = prepared_engine(profile, 13);
    let count = profile.dims.count();

    c.bench_function("roundtrip_768x1024", |b| {
        b.iter(|| {
            engine.serialize().unwrap();
            engine.clear_decoded();
            black_box(engine.decode(count).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_resize_cold,
    bench_resize_preserving,
    bench_sum,
    bench_serialize,
    bench_roundtrip
);
criterion_main!(benches);
