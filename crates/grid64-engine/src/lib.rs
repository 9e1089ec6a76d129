//! Single-slot grid engine for grid64.
//!
//! An [`Engine`] owns one storage arena, at most one grid, and at most one
//! serialized encoding of that grid. The typical cycle is
//!
//! ```text
//! resize -> write cells -> sum -> serialize -> clear_decoded -> decode -> sum
//! ```
//!
//! Every operation either applies fully or returns an error with the engine
//! unchanged. The engine is single-threaded; wrap it in a lock to share it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod reducer;
pub(crate) mod serializer;
pub mod slot;

pub use config::{ConfigError, DecodePolicy, EngineConfig};
pub use engine::Engine;
pub use reducer::sum;
pub use slot::SlotState;
