//! Engine configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use grid64_arena::{ArenaConfig, ArenaError};

/// What `decode` does when the slot already holds a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Replace the held grid.
    #[default]
    Overwrite,
    /// Reject with [`GridError::SlotOccupied`](grid64_core::GridError::SlotOccupied)
    /// unless the slot is empty.
    RequireCleared,
}

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Arena sizing and limit.
    pub arena: ArenaConfig,
    /// Behaviour of `decode` on a populated slot. Default: overwrite.
    pub decode_policy: DecodePolicy,
    /// When set, `clear_decoded` compacts the serialized region to the
    /// start of the arena and releases the rest. Default: off.
    pub reclaim_on_clear: bool,
}

impl EngineConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        Ok(())
    }
}

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Arena configuration is invalid.
    Arena(ArenaError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
        }
    }
}

impl From<ArenaError> for ConfigError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
