//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Growth would exceed the configured limit, or the allocator refused.
    CapacityExceeded {
        /// Total arena size in bytes that was requested.
        requested: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// A region extends past the end of the arena.
    OutOfBounds {
        /// Region start in bytes.
        offset: usize,
        /// Region length in bytes.
        len: usize,
        /// Current arena size in bytes.
        size: usize,
    },
    /// A typed view was requested over a region that is not 8-byte aligned.
    Misaligned {
        /// Region start in bytes.
        offset: usize,
        /// Region length in bytes.
        len: usize,
    },
    /// The arena configuration failed validation.
    InvalidConfig {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { requested, limit } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, limit {limit} bytes"
                )
            }
            Self::OutOfBounds { offset, len, size } => {
                write!(
                    f,
                    "region [{offset}, +{len}) out of bounds for arena of {size} bytes"
                )
            }
            Self::Misaligned { offset, len } => {
                write!(f, "region [{offset}, +{len}) is not 8-byte aligned")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl Error for ArenaError {}
