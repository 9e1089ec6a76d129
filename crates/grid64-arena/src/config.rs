//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for the storage arena.
///
/// Controls the initial allocation, the growth step, and the hard limit.
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Bytes allocated when the arena is created.
    ///
    /// Default: 0. The first resize allocates what it needs.
    pub initial_bytes: usize,

    /// Smallest amount the arena grows by in one step, in bytes.
    ///
    /// Default: 65_536 (one WebAssembly page). Growth is also at least
    /// doubling, so this only matters for small arenas.
    pub min_growth_bytes: usize,

    /// Hard upper bound on the arena size in bytes.
    ///
    /// Default: 1GB. Requests beyond this fail with
    /// [`ArenaError::CapacityExceeded`]. Must be a non-zero multiple of 8.
    pub max_bytes: usize,
}

impl ArenaConfig {
    /// Default growth step: one 64KB WebAssembly page.
    pub const DEFAULT_MIN_GROWTH_BYTES: usize = 65_536;

    /// Default arena limit: 1GB.
    pub const DEFAULT_MAX_BYTES: usize = 1 << 30;

    /// Create a config with the given hard limit and default growth.
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.max_bytes == 0 || self.max_bytes % 8 != 0 {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "max_bytes must be a non-zero multiple of 8, got {}",
                    self.max_bytes
                ),
            });
        }
        if self.initial_bytes > self.max_bytes {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "initial_bytes {} exceeds max_bytes {}",
                    self.initial_bytes, self.max_bytes
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial_bytes: 0,
            min_growth_bytes: Self::DEFAULT_MIN_GROWTH_BYTES,
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }
}
