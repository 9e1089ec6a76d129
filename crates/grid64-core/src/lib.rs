//! Core types for the grid64 buffer engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the arena, codec, engine and FFI crates: grid
//! dimensions, per-grid metadata, and the engine-level error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dims;
pub mod error;
pub mod meta;

pub use dims::{Dims, CELL_BYTES};
pub use error::GridError;
pub use meta::{MetaValue, Metadata};
