//! Whole-grid encoding, validation, and decoding.

use std::ops::Range;

use grid64_core::{Metadata, CELL_BYTES};

use crate::codec::{metadata_to_vec, read_cells, read_metadata, write_cells, SliceReader};
use crate::error::CodecError;
use crate::hash::checksum;
use crate::header::Header;
use crate::{CHECKSUM_LEN, HEADER_LEN};

/// Total encoded size for `count` cells and a pre-encoded metadata section
/// of `meta_len` bytes, or `None` on overflow.
pub fn encoded_len(count: usize, meta_len: usize) -> Option<usize> {
    count
        .checked_mul(CELL_BYTES)?
        .checked_add(HEADER_LEN)?
        .checked_add(meta_len)?
        .checked_add(CHECKSUM_LEN)
}

/// Encode a grid into `out`, returning the number of bytes written.
///
/// `meta` is the output of [`metadata_to_vec`]. Callers that encode the
/// same grid repeatedly keep that buffer and the header around and only
/// pay for the cell copy and the checksum.
pub fn encode_into(
    out: &mut [u8],
    header: &Header,
    cells: &[f64],
    meta: &[u8],
) -> Result<usize, CodecError> {
    let count = header.checked_count()?;
    if cells.len() != count {
        return Err(CodecError::CellCountMismatch {
            expected: count,
            found: cells.len(),
        });
    }
    let len = encoded_len(count, meta.len()).ok_or(CodecError::DimensionOverflow {
        height: header.dims.height as u64,
        width: header.dims.width as u64,
    })?;
    if out.len() < len {
        return Err(CodecError::BufferTooSmall {
            needed: len,
            available: out.len(),
        });
    }

    let cells_end = HEADER_LEN + count * CELL_BYTES;
    let body_end = cells_end + meta.len();
    out[..HEADER_LEN].copy_from_slice(&header.to_bytes());
    write_cells(&mut out[HEADER_LEN..cells_end], cells)?;
    out[cells_end..body_end].copy_from_slice(meta);
    let sum = checksum(&out[..body_end]);
    out[body_end..len].copy_from_slice(&sum.to_le_bytes());
    Ok(len)
}

/// Encode a grid into a freshly allocated buffer.
pub fn encode_to_vec(
    header: &Header,
    cells: &[f64],
    metadata: &Metadata,
) -> Result<Vec<u8>, CodecError> {
    let meta = metadata_to_vec(metadata)?;
    let len = encoded_len(cells.len(), meta.len()).ok_or(CodecError::DimensionOverflow {
        height: header.dims.height as u64,
        width: header.dims.width as u64,
    })?;
    let mut out = vec![0u8; len];
    encode_into(&mut out, header, cells, &meta)?;
    Ok(out)
}

/// A validated encoding, with cells left in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Inspected {
    /// The parsed header.
    pub header: Header,
    /// Byte range of the cell block within the inspected slice.
    pub cells: Range<usize>,
    /// The decoded metadata section.
    pub metadata: Metadata,
}

impl Inspected {
    /// Number of encoded cells.
    pub fn count(&self) -> usize {
        self.header.dims.count()
    }
}

/// Fully validate `bytes` as one encoding without copying the cells.
///
/// `bytes` must be exactly one encoding: short input is
/// [`CodecError::Truncated`], extra input is [`CodecError::TrailingBytes`].
/// The checksum is verified last.
pub fn inspect(bytes: &[u8]) -> Result<Inspected, CodecError> {
    let mut r = SliceReader::new(bytes);
    let header = Header::read(&mut r)?;
    let count = header.checked_count()?;
    let start = r.position();
    r.take(count * CELL_BYTES)?;
    let cells = start..r.position();
    let metadata = read_metadata(&mut r)?;
    let body_end = r.position();
    let stored = r.read_u64_le()?;
    if r.remaining() != 0 {
        return Err(CodecError::TrailingBytes {
            extra: r.remaining(),
        });
    }
    let computed = checksum(&bytes[..body_end]);
    if stored != computed {
        return Err(CodecError::ChecksumMismatch { stored, computed });
    }
    Ok(Inspected {
        header,
        cells,
        metadata,
    })
}

/// An owned decoded grid.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedGrid {
    /// The parsed header.
    pub header: Header,
    /// Row-major cell values.
    pub cells: Vec<f64>,
    /// Metadata in encoded order.
    pub metadata: Metadata,
}

/// Validate and decode `bytes` into owned values.
pub fn decode_from_slice(bytes: &[u8]) -> Result<DecodedGrid, CodecError> {
    let Inspected {
        header,
        cells: range,
        metadata,
    } = inspect(bytes)?;
    let mut cells = vec![0.0; header.dims.count()];
    read_cells(&bytes[range], &mut cells)?;
    Ok(DecodedGrid {
        header,
        cells,
        metadata,
    })
}
