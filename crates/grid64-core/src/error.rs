//! Engine-level error taxonomy.
//!
//! Every failure at the engine boundary is one of these variants. Subsystem
//! errors (arena, codec, config) convert into a [`GridError`] before they
//! reach a caller, and the FFI layer maps each variant to a stable status
//! code.

use std::error::Error;
use std::fmt;

/// Errors returned by grid engine operations.
///
/// An operation that returns any of these has left the engine's observable
/// state unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Arena growth would exceed the configured limit or the allocator
    /// refused the request.
    OutOfMemory {
        /// Total arena bytes the operation needed.
        requested: usize,
        /// Configured arena limit in bytes.
        limit: usize,
    },
    /// Dimensions were negative, overflowed, or did not match the grid.
    InvalidDimensions {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The encoded element count differs from what the caller expected.
    DecodeMismatch {
        /// Count the caller asserted.
        expected: usize,
        /// Count found in the serialized region.
        found: usize,
    },
    /// Decode was requested but no serialized region is retained.
    NothingToDecode,
    /// The serialized region failed validation.
    CorruptEncoding {
        /// Description of the codec failure.
        reason: String,
    },
    /// Decode policy requires a cleared slot but the slot is populated.
    SlotOccupied,
    /// The operation needs a populated grid and the slot is empty.
    NoGrid,
    /// An engine invariant was violated (arena bounds or alignment).
    Internal {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested, limit } => {
                write!(
                    f,
                    "out of memory: requested {requested} bytes, limit {limit} bytes"
                )
            }
            Self::InvalidDimensions { reason } => write!(f, "invalid dimensions: {reason}"),
            Self::DecodeMismatch { expected, found } => {
                write!(
                    f,
                    "decode mismatch: expected {expected} elements, found {found}"
                )
            }
            Self::NothingToDecode => write!(f, "no serialized region to decode"),
            Self::CorruptEncoding { reason } => write!(f, "corrupt encoding: {reason}"),
            Self::SlotOccupied => write!(f, "grid slot is occupied; clear it before decoding"),
            Self::NoGrid => write!(f, "no grid is populated"),
            Self::Internal { reason } => write!(f, "internal error: {reason}"),
        }
    }
}

impl Error for GridError {}
