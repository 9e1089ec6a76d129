//! Test fixtures for grid64 development.
//!
//! Deterministic cell generators, sample metadata, and ready-made
//! encodings for exercising decode paths without an engine.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    encoded_grid, patterned_cells, random_cells, sample_metadata, scenario_dims, SCENARIO_FILL,
};
