//! Reusable grid fixtures.
//!
//! - [`patterned_cells`]: distinct, exactly representable values.
//! - [`random_cells`]: seeded pseudo-random values via ChaCha8.
//! - [`sample_metadata`]: one entry of every value type.
//! - [`encoded_grid`]: a valid encoding built without an engine.

use grid64_codec::{encode_to_vec, Header};
use grid64_core::{Dims, MetaValue, Metadata};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fill value of the reference scenario.
pub const SCENARIO_FILL: f64 = 4.2;

/// Dimensions of the reference scenario: 768 rows of 1024 columns.
pub fn scenario_dims() -> Dims {
    Dims::new(768, 1024)
}

/// `count` distinct cells: `i * 0.5 - 10.0`.
///
/// Every value and every partial sum below 2^50 is exact, so sums over
/// these cells do not depend on rounding.
pub fn patterned_cells(count: usize) -> Vec<f64> {
    (0..count).map(|i| i as f64 * 0.5 - 10.0).collect()
}

/// `count` cells uniformly spread over `[-1000, 1000)`, reproducible from
/// `seed`.
pub fn random_cells(seed: u64, count: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            // 53 random mantissa bits -> [0, 1)
            let unit = (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
            unit * 2000.0 - 1000.0
        })
        .collect()
}

/// Metadata with one entry of each value type, in a fixed order.
pub fn sample_metadata() -> Metadata {
    let mut meta = Metadata::new();
    meta.insert("source", "fixture");
    meta.insert("scale", 0.125);
    meta.insert("calibrated", true);
    meta.insert("comment", MetaValue::Null);
    meta
}

/// A valid encoding of a populated `dims` grid with patterned cells and
/// sample metadata.
pub fn encoded_grid(dims: Dims) -> Vec<u8> {
    let cells = patterned_cells(dims.count());
    match encode_to_vec(&Header::populated(dims), &cells, &sample_metadata()) {
        Ok(bytes) => bytes,
        Err(e) => panic!("fixture encoding of {dims} failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_cells_are_reproducible() {
        assert_eq!(random_cells(7, 32), random_cells(7, 32));
        assert_ne!(random_cells(7, 32), random_cells(8, 32));
        assert!(random_cells(1, 256).iter().all(|v| (-1000.0..1000.0).contains(v)));
    }

    #[test]
    fn patterned_cells_are_distinct() {
        let cells = patterned_cells(5);
        assert_eq!(cells, vec![-10.0, -9.5, -9.0, -8.5, -8.0]);
    }

    #[test]
    fn encoded_grid_decodes() {
        let bytes = encoded_grid(Dims::new(3, 2));
        let decoded = grid64_codec::decode_from_slice(&bytes).unwrap();
        assert_eq!(decoded.cells, patterned_cells(6));
        assert_eq!(decoded.metadata, sample_metadata());
    }
}
