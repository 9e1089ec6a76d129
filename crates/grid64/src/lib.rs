//! grid64: a resizable `f64` grid buffer with an in-place binary codec.
//!
//! This is the facade crate that re-exports the public API of the grid64
//! sub-crates. Adding `grid64` as a single dependency is enough for most
//! users; the C ABI lives separately in `grid64-ffi`.
//!
//! # Quick start
//!
//! ```rust
//! use grid64::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! assert!(engine.sum().is_nan()); // no data yet
//!
//! engine.resize(Dims::new(3, 4), 0.5).unwrap();
//! engine.cells_mut()[0] = 10.0;
//! assert_eq!(engine.sum(), 15.5);
//!
//! let len = engine.serialize().unwrap();
//! assert!(len > 0);
//! assert!(engine.clear_decoded());
//! assert_eq!(engine.decode(12).unwrap(), 12);
//! assert_eq!(engine.sum(), 15.5);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `grid64-core` | Dimensions, metadata, the error taxonomy |
//! | [`arena`] | `grid64-arena` | Growable aligned storage and regions |
//! | [`codec`] | `grid64-codec` | Wire format, validation, standalone encode/decode |
//! | [`engine`] | `grid64-engine` | The single-slot engine and its configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Dimensions, metadata, and errors (`grid64-core`).
pub use grid64_core as types;

/// Growable, 8-byte aligned storage (`grid64-arena`).
///
/// Only needed to tune [`arena::ArenaConfig`] or to use an
/// [`arena::Arena`] directly.
pub use grid64_arena as arena;

/// Binary format (`grid64-codec`).
///
/// [`codec::encode_to_vec`] and [`codec::decode_from_slice`] work on plain
/// byte buffers, for encodings that travel between processes.
pub use grid64_codec as codec;

/// The engine (`grid64-engine`).
pub use grid64_engine as engine;

/// Common imports for typical grid64 usage.
///
/// ```rust
/// use grid64::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use grid64_core::{Dims, GridError, MetaValue, Metadata};

    // Configuration
    pub use grid64_arena::ArenaConfig;
    pub use grid64_engine::{ConfigError, DecodePolicy, EngineConfig};

    // Engine
    pub use grid64_engine::{Engine, SlotState};
}
