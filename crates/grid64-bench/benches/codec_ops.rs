//! Criterion micro-benchmarks for the grid codec and checksum.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use grid64_codec::{checksum, decode_from_slice, encode_to_vec, inspect, Header};
use grid64_core::Dims;
use grid64_test_utils::{random_cells, sample_metadata};

const DIMS: Dims = Dims::new(768, 1024);

/// Benchmark: encode the reference grid into a fresh buffer.
fn bench_codec_encode(c: &mut Criterion) {
    let cells = random_cells(1, DIMS.count());
    let meta = sample_metadata();
    let header = Header::populated(DIMS);

    c.bench_function("codec_encode_768x1024", |b| {
        b.iter(|| {
            let bytes = encode_to_vec(&header, &cells, &meta).unwrap();
            black_box(bytes.len());
        });
    });
}

/// Benchmark: validate without copying cells.
fn bench_codec_inspect(c: &mut Criterion) {
    let cells = random_cells(2, DIMS.count());
    let bytes = encode_to_vec(&Header::populated(DIMS), &cells, &sample_metadata()).unwrap();

    c.bench_function("codec_inspect_768x1024", |b| {
        b.iter(|| black_box(inspect(&bytes).unwrap().count()));
    });
}

/// Benchmark: validate and decode into owned cells.
fn bench_codec_decode(c: &mut Criterion) {
    let cells = random_cells(3, DIMS.count());
    let bytes = encode_to_vec(&Header::populated(DIMS), &cells, &sample_metadata()).unwrap();

    c.bench_function("codec_decode_768x1024", |b| {
        b.iter(|| black_box(decode_from_slice(&bytes).unwrap().cells.len()));
    });
}

/// Benchmark: FNV-1a over 6MB.
fn bench_checksum_6mb(c: &mut Criterion) {
    let bytes = vec![0x5Au8; DIMS.count() * 8];
    c.bench_function("checksum_6mb", |b| {
        b.iter(|| black_box(checksum(&bytes)));
    });
}

criterion_group!(
    benches,
    bench_codec_encode,
    bench_codec_inspect,
    bench_codec_decode,
    bench_checksum_6mb
);
criterion_main!(benches);
