//! Error types for the codec.

use std::fmt;
use std::io;

use grid64_core::GridError;

/// Errors that can occur while encoding or validating an encoding.
#[derive(Debug)]
pub enum CodecError {
    /// An I/O error other than running out of input or output space.
    Io(io::Error),
    /// The data does not start with the expected `b"GR64"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the data.
        found: u8,
    },
    /// The fixed header is inconsistent (flags, reserved bytes).
    InvalidHeader {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The data ends before a field it announces.
    Truncated {
        /// Bytes needed to continue.
        needed: usize,
        /// Bytes remaining.
        available: usize,
    },
    /// `height * width * 8` does not fit in `usize`.
    DimensionOverflow {
        /// Encoded height.
        height: u64,
        /// Encoded width.
        width: u64,
    },
    /// The metadata section could not be decoded.
    MalformedMetadata {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The stored checksum does not match the data.
    ChecksumMismatch {
        /// Checksum stored in the trailer.
        stored: u64,
        /// Checksum computed over the data.
        computed: u64,
    },
    /// Bytes follow the checksum.
    TrailingBytes {
        /// Number of unexpected bytes.
        extra: usize,
    },
    /// The output slice is too small for the encoding.
    BufferTooSmall {
        /// Bytes the encoding needs.
        needed: usize,
        /// Bytes the slice provides.
        available: usize,
    },
    /// The cell slice length disagrees with the header dimensions.
    CellCountMismatch {
        /// `height * width` from the header.
        expected: usize,
        /// Length of the cell slice.
        found: usize,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"GR64\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::InvalidHeader { detail } => write!(f, "invalid header: {detail}"),
            Self::Truncated { needed, available } => {
                write!(f, "truncated: needed {needed} bytes, {available} available")
            }
            Self::DimensionOverflow { height, width } => {
                write!(f, "dimensions {height}x{width} overflow the address space")
            }
            Self::MalformedMetadata { detail } => write!(f, "malformed metadata: {detail}"),
            Self::ChecksumMismatch { stored, computed } => {
                write!(
                    f,
                    "checksum mismatch: stored={stored:#018x}, computed={computed:#018x}"
                )
            }
            Self::TrailingBytes { extra } => {
                write!(f, "{extra} trailing bytes after checksum")
            }
            Self::BufferTooSmall { needed, available } => {
                write!(
                    f,
                    "output buffer too small: needed {needed} bytes, {available} available"
                )
            }
            Self::CellCountMismatch { expected, found } => {
                write!(f, "header describes {expected} cells but {found} were given")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<CodecError> for GridError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::BufferTooSmall { .. } | CodecError::CellCountMismatch { .. } => {
                GridError::Internal {
                    reason: e.to_string(),
                }
            }
            other => GridError::CorruptEncoding {
                reason: other.to_string(),
            },
        }
    }
}
