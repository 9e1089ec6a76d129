//! The fixed 24-byte header.

use grid64_core::Dims;

use crate::codec::SliceReader;
use crate::error::CodecError;
use crate::{FLAG_POPULATED, FORMAT_VERSION, HEADER_LEN, MAGIC};

/// Decoded header fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Grid dimensions. `0x0` when the slot was not populated.
    pub dims: Dims,
    /// Whether the encoding carries a populated grid.
    pub populated: bool,
}

impl Header {
    /// Header for a populated grid of `dims`.
    pub fn populated(dims: Dims) -> Self {
        Self {
            dims,
            populated: true,
        }
    }

    /// Header for an empty slot.
    pub fn empty() -> Self {
        Self {
            dims: Dims::EMPTY,
            populated: false,
        }
    }

    /// Number of cells the header announces.
    pub fn checked_count(&self) -> Result<usize, CodecError> {
        self.dims
            .checked_bytes()
            .map(|_| self.dims.count())
            .ok_or(CodecError::DimensionOverflow {
                height: self.dims.height as u64,
                width: self.dims.width as u64,
            })
    }

    /// Serialize to the fixed wire representation.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&MAGIC);
        out[4] = FORMAT_VERSION;
        out[5] = if self.populated { FLAG_POPULATED } else { 0 };
        // bytes 6..8 reserved, zero
        out[8..16].copy_from_slice(&(self.dims.height as u64).to_le_bytes());
        out[16..24].copy_from_slice(&(self.dims.width as u64).to_le_bytes());
        out
    }

    /// Parse and validate a header from the front of `r`.
    ///
    /// Checks magic, version, flags, the reserved field, that the
    /// dimensions fit the address space, and that an unpopulated header
    /// carries `0x0`.
    pub fn read(r: &mut SliceReader<'_>) -> Result<Self, CodecError> {
        let magic = r.take(4)?;
        if magic != MAGIC {
            return Err(CodecError::InvalidMagic);
        }
        let version = r.read_u8()?;
        if version != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion { found: version });
        }
        let flags = r.read_u8()?;
        if flags & !FLAG_POPULATED != 0 {
            return Err(CodecError::InvalidHeader {
                detail: format!("unknown flag bits {flags:#04x}"),
            });
        }
        let reserved = r.read_u16_le()?;
        if reserved != 0 {
            return Err(CodecError::InvalidHeader {
                detail: format!("reserved field is {reserved:#06x}, expected 0"),
            });
        }
        let height = r.read_u64_le()?;
        let width = r.read_u64_le()?;
        let overflow = CodecError::DimensionOverflow { height, width };
        let dims = match (usize::try_from(height), usize::try_from(width)) {
            (Ok(h), Ok(w)) => Dims::new(h, w),
            _ => return Err(overflow),
        };
        if dims.checked_bytes().is_none() {
            return Err(overflow);
        }
        let populated = flags & FLAG_POPULATED != 0;
        if !populated && dims != Dims::EMPTY {
            return Err(CodecError::InvalidHeader {
                detail: format!("unpopulated encoding carries dimensions {dims}"),
            });
        }
        Ok(Self { dims, populated })
    }
}
