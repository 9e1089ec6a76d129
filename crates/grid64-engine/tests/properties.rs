//! Property tests for the engine's observable contract.

use grid64_core::{Dims, GridError};
use grid64_engine::{DecodePolicy, Engine, EngineConfig, SlotState};
use grid64_test_utils::random_cells;
use proptest::prelude::*;

fn engine() -> Engine {
    Engine::new(EngineConfig::default()).unwrap()
}

fn populated(dims: Dims, seed: u64) -> Engine {
    let mut e = engine();
    e.resize(dims, 0.0).unwrap();
    e.cells_mut()
        .copy_from_slice(&random_cells(seed, dims.count()));
    e
}

/// Reference model of a resize: a nested vector grid.
fn model_resize(model: &mut Vec<Vec<f64>>, dims: Dims, fill: f64) {
    model.truncate(dims.height);
    for row in model.iter_mut() {
        row.resize(dims.width, fill);
    }
    while model.len() < dims.height {
        model.push(vec![fill; dims.width]);
    }
}

proptest! {
    #[test]
    fn roundtrip_preserves_cells_and_sum(
        h in 0usize..40, w in 0usize..40, seed in any::<u64>(),
    ) {
        let dims = Dims::new(h, w);
        let mut e = populated(dims, seed);
        let cells = e.cells().to_vec();
        let sum = e.sum();
        e.serialize().unwrap();
        e.clear_decoded();
        prop_assert_eq!(e.decode(dims.count()).unwrap(), dims.count());
        prop_assert_eq!(e.dims(), dims);
        prop_assert_eq!(e.cells(), &cells[..]);
        prop_assert_eq!(e.sum().to_bits(), sum.to_bits());
    }

    #[test]
    fn resize_sequence_matches_model(
        steps in prop::collection::vec((0usize..12, 0usize..12, -5.0f64..5.0), 1..8),
    ) {
        let mut e = engine();
        let mut model: Vec<Vec<f64>> = Vec::new();
        for (i, (h, w, fill)) in steps.into_iter().enumerate() {
            let dims = Dims::new(h, w);
            e.resize(dims, fill).unwrap();
            model_resize(&mut model, dims, fill);
            // Perturb so later steps see distinct values.
            if let Some(v) = e.cells_mut().first_mut() {
                *v = i as f64 * 100.0;
                model[0][0] = *v;
            }
            let flat: Vec<f64> = model.iter().flatten().copied().collect();
            prop_assert_eq!(e.cells(), &flat[..]);
        }
    }

    #[test]
    fn mismatch_never_mutates(
        h in 1usize..20, w in 1usize..20, delta in 1usize..50, seed in any::<u64>(),
    ) {
        let dims = Dims::new(h, w);
        let mut e = populated(dims, seed);
        e.serialize().unwrap();
        let bytes = e.serialized_bytes().unwrap().to_vec();
        let cells = e.cells().to_vec();
        let err = e.decode(dims.count() + delta).unwrap_err();
        let is_mismatch = matches!(err, GridError::DecodeMismatch { .. });
        prop_assert!(is_mismatch);
        prop_assert_eq!(e.cells(), &cells[..]);
        prop_assert_eq!(e.serialized_bytes().unwrap(), &bytes[..]);
        prop_assert_eq!(e.state(), SlotState::Live);
    }

    #[test]
    fn corrupted_region_rejected_without_mutation(
        h in 1usize..10, w in 1usize..10, pos_frac in 0.0f64..1.0, mask in 1u8..=255,
    ) {
        let dims = Dims::new(h, w);
        let mut e = populated(dims, 99);
        let len = e.serialize().unwrap();
        let mut bytes = e.serialized_bytes().unwrap().to_vec();
        let pos = ((len as f64 * pos_frac) as usize).min(len - 1);
        bytes[pos] ^= mask;
        e.stage_serialized(len).unwrap().copy_from_slice(&bytes);
        let cells = e.cells().to_vec();

        let err = e.decode(dims.count()).unwrap_err();
        let rejected = matches!(
            err,
            GridError::CorruptEncoding { .. } | GridError::DecodeMismatch { .. }
        );
        prop_assert!(rejected, "unexpected {err:?}");
        prop_assert_eq!(e.cells(), &cells[..]);
    }

    #[test]
    fn clear_is_idempotent(h in 0usize..8, w in 0usize..8, extra in 0usize..4) {
        let mut e = engine();
        e.resize(Dims::new(h, w), 1.0).unwrap();
        prop_assert!(e.clear_decoded());
        for _ in 0..extra {
            prop_assert!(!e.clear_decoded());
        }
        prop_assert_eq!(e.data_count(), 0);
        prop_assert!(e.sum().is_nan());
    }

    #[test]
    fn decode_relocates_for_larger_grids(
        small in 1usize..6, big in 6usize..30, seed in any::<u64>(),
    ) {
        let config = EngineConfig {
            decode_policy: DecodePolicy::RequireCleared,
            reclaim_on_clear: true,
            ..EngineConfig::default()
        };
        let mut source = populated(Dims::new(big, big), seed);
        source.serialize().unwrap();
        let bytes = source.serialized_bytes().unwrap().to_vec();

        let mut e = Engine::new(config).unwrap();
        e.resize(Dims::new(small, small), 1.0).unwrap();
        e.clear_decoded();
        e.stage_serialized(bytes.len()).unwrap().copy_from_slice(&bytes);
        prop_assert_eq!(e.decode(big * big).unwrap(), big * big);
        prop_assert_eq!(e.serialized_offset(), Some(big * big * 8));
        prop_assert_eq!(e.cells(), source.cells());
    }
}

#[test]
fn serialize_then_decode_into_fresh_engine() {
    let mut source = populated(Dims::new(5, 7), 3);
    source.set_metadata("origin", "source");
    source.serialize().unwrap();
    let bytes = source.serialized_bytes().unwrap().to_vec();

    let mut sink = engine();
    sink.stage_serialized(bytes.len())
        .unwrap()
        .copy_from_slice(&bytes);
    assert_eq!(sink.decode(35).unwrap(), 35);
    assert_eq!(sink.cells(), source.cells());
    assert_eq!(sink.metadata(), source.metadata());
}
