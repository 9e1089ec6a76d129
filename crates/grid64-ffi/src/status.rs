//! C-compatible status codes.
//!
//! [`Grid64Status`] is a `repr(i32)` enum covering every failure the
//! engine can report, plus the boundary-only conditions (bad arguments,
//! poisoned lock, caught panic).

use grid64_core::GridError;

/// C-compatible status code returned by FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grid64Status {
    /// Success.
    Ok = 0,
    /// Arena growth exceeded the limit or the allocator refused.
    OutOfMemory = -1,
    /// Dimensions negative, overflowing, or inconsistent with the grid.
    InvalidDimensions = -2,
    /// Encoded element count differs from the expected count.
    DecodeMismatch = -3,
    /// No serialized region to decode.
    NothingToDecode = -4,
    /// Serialized region failed validation.
    CorruptEncoding = -5,
    /// Decode policy requires a cleared slot.
    SlotOccupied = -6,
    /// The operation needs a populated grid.
    NoGrid = -7,
    /// An argument is negative or otherwise out of range.
    InvalidArgument = -8,
    /// The result does not fit the return type.
    Overflow = -9,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&GridError> for Grid64Status {
    fn from(e: &GridError) -> Self {
        match e {
            GridError::OutOfMemory { .. } => Grid64Status::OutOfMemory,
            GridError::InvalidDimensions { .. } => Grid64Status::InvalidDimensions,
            GridError::DecodeMismatch { .. } => Grid64Status::DecodeMismatch,
            GridError::NothingToDecode => Grid64Status::NothingToDecode,
            GridError::CorruptEncoding { .. } => Grid64Status::CorruptEncoding,
            GridError::SlotOccupied => Grid64Status::SlotOccupied,
            GridError::NoGrid => Grid64Status::NoGrid,
            GridError::Internal { .. } => Grid64Status::InternalError,
        }
    }
}

/// Convert a non-negative count or length to an `i32` return value.
pub(crate) fn len_to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(Grid64Status::Overflow as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(Grid64Status::Ok as i32, 0);
        assert_eq!(Grid64Status::OutOfMemory as i32, -1);
        assert_eq!(Grid64Status::InvalidDimensions as i32, -2);
        assert_eq!(Grid64Status::DecodeMismatch as i32, -3);
        assert_eq!(Grid64Status::NothingToDecode as i32, -4);
        assert_eq!(Grid64Status::CorruptEncoding as i32, -5);
        assert_eq!(Grid64Status::SlotOccupied as i32, -6);
        assert_eq!(Grid64Status::NoGrid as i32, -7);
        assert_eq!(Grid64Status::InvalidArgument as i32, -8);
        assert_eq!(Grid64Status::Overflow as i32, -9);
        assert_eq!(Grid64Status::InternalError as i32, -20);
        assert_eq!(Grid64Status::Panicked as i32, -128);
    }

    #[test]
    fn grid_error_to_status() {
        assert_eq!(
            Grid64Status::from(&GridError::OutOfMemory {
                requested: 10,
                limit: 8
            }),
            Grid64Status::OutOfMemory
        );
        assert_eq!(
            Grid64Status::from(&GridError::InvalidDimensions { reason: "x".into() }),
            Grid64Status::InvalidDimensions
        );
        assert_eq!(
            Grid64Status::from(&GridError::DecodeMismatch {
                expected: 1,
                found: 2
            }),
            Grid64Status::DecodeMismatch
        );
        assert_eq!(
            Grid64Status::from(&GridError::NothingToDecode),
            Grid64Status::NothingToDecode
        );
        assert_eq!(
            Grid64Status::from(&GridError::CorruptEncoding { reason: "x".into() }),
            Grid64Status::CorruptEncoding
        );
        assert_eq!(
            Grid64Status::from(&GridError::SlotOccupied),
            Grid64Status::SlotOccupied
        );
        assert_eq!(Grid64Status::from(&GridError::NoGrid), Grid64Status::NoGrid);
        assert_eq!(
            Grid64Status::from(&GridError::Internal { reason: "x".into() }),
            Grid64Status::InternalError
        );
    }

    #[test]
    fn oversized_length_reports_overflow() {
        assert_eq!(len_to_i32(42), 42);
        assert_eq!(len_to_i32(usize::MAX), Grid64Status::Overflow as i32);
    }
}
