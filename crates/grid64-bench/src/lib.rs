//! Benchmark profiles for the grid64 buffer engine.
//!
//! - [`reference_profile`]: 768x1024 grid (786K cells), the harness scenario
//! - [`small_profile`]: 64x64 grid for per-call overhead
//! - [`prepared_engine`]: an engine resized and filled with seeded cells

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use grid64_core::Dims;
use grid64_engine::{Engine, EngineConfig};
use grid64_test_utils::random_cells;

/// Grid shape and fill for one benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct GridProfile {
    /// Grid dimensions.
    pub dims: Dims,
    /// Initial fill value.
    pub fill: f64,
}

/// The harness scenario: 768 rows of 1024 columns filled with 4.2.
pub fn reference_profile() -> GridProfile {
    GridProfile {
        dims: Dims::new(768, 1024),
        fill: 4.2,
    }
}

/// A 64x64 grid, small enough that fixed costs dominate.
pub fn small_profile() -> GridProfile {
    GridProfile {
        dims: Dims::new(64, 64),
        fill: 1.0,
    }
}

/// Build an engine for `profile` with cells drawn from `seed`.
///
/// Panics if the profile does not fit the default arena limit.
pub fn prepared_engine(profile: GridProfile, seed: u64) -> Engine {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    engine.resize(profile.dims, profile.fill).unwrap();
    engine
        .cells_mut()
        .copy_from_slice(&random_cells(seed, profile.dims.count()));
    engine
}
