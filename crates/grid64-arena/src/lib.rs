//! Contiguous storage arena for the grid64 engine.
//!
//! The engine owns exactly one [`Arena`]: a single growable byte region
//! that every other component addresses by offset. Callers outside the
//! engine never hold references into it; they receive `(offset, length)`
//! pairs and re-fetch them after any operation that may relocate storage.
//!
//! # Layout
//!
//! ```text
//! Arena (Vec<u64> backing, 8-byte aligned)
//! ├── [0, grid_reserved)            grid cells, f64, row-major
//! ├── [grid_reserved, +ser_reserved) serialized region
//! └── [.., size)                    growth headroom
//! ```
//!
//! The layout itself is decided by the engine; the arena only guarantees
//! alignment, bounds checking, amortized growth, and strong failure
//! semantics: a failed [`Arena::ensure_capacity`] leaves the arena exactly
//! as it was.
//!
//! # Generations
//!
//! [`Arena::generation`] increments whenever the backing storage may have
//! moved. Raw pointers handed across the C boundary are only valid for the
//! generation in which they were obtained.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod region;

pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use region::Region;

impl From<ArenaError> for grid64_core::GridError {
    fn from(e: ArenaError) -> Self {
        match e {
            ArenaError::CapacityExceeded { requested, limit } => {
                grid64_core::GridError::OutOfMemory { requested, limit }
            }
            other => grid64_core::GridError::Internal {
                reason: other.to_string(),
            },
        }
    }
}
