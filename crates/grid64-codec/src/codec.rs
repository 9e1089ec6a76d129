//! Primitive field encoding, cell blocks, and the metadata section.
//!
//! Writers take any [`Write`] sink. Readers work on a [`SliceReader`] so
//! every length prefix is checked against the remaining input before
//! anything is allocated.

use std::io::Write;

use grid64_core::{MetaValue, Metadata, CELL_BYTES};

use crate::error::CodecError;

/// Metadata value tag: null.
pub const TAG_NULL: u8 = 0;
/// Metadata value tag: boolean stored as one byte.
pub const TAG_BOOL: u8 = 1;
/// Metadata value tag: little-endian f64.
pub const TAG_NUMBER: u8 = 2;
/// Metadata value tag: length-prefixed UTF-8 string.
pub const TAG_TEXT: u8 = 3;
/// Metadata value tag: u32 item count followed by tagged values.
pub const TAG_LIST: u8 = 4;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), CodecError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), CodecError> {
    let len = u32::try_from(s.len()).map_err(|_| CodecError::MalformedMetadata {
        detail: format!("string of {} bytes exceeds u32 length prefix", s.len()),
    })?;
    write_u32_le(w, len)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Forward-only cursor over an input slice.
#[derive(Clone, Debug)]
pub struct SliceReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Start reading at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian f64.
    pub fn read_f64_le(&mut self) -> Result<f64, CodecError> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_length_prefixed_str(&mut self) -> Result<String, CodecError> {
        let len = self.read_u32_le()? as usize;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| CodecError::MalformedMetadata {
                detail: format!("invalid UTF-8 at byte {}: {e}", self.pos - len),
            })
    }
}

// ── Cells ───────────────────────────────────────────────────────

/// Write `cells` as consecutive little-endian f64 values into `out`.
///
/// `out` must be exactly `cells.len() * 8` bytes.
pub fn write_cells(out: &mut [u8], cells: &[f64]) -> Result<(), CodecError> {
    check_cell_block(out.len(), cells.len())?;
    if cfg!(target_endian = "little") {
        out.copy_from_slice(bytemuck::cast_slice(cells));
    } else {
        for (chunk, v) in out.chunks_exact_mut(CELL_BYTES).zip(cells) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
    }
    Ok(())
}

/// Read consecutive little-endian f64 values from `src` into `cells`.
///
/// `src` may have any alignment; `src.len()` must equal `cells.len() * 8`.
pub fn read_cells(src: &[u8], cells: &mut [f64]) -> Result<(), CodecError> {
    check_cell_block(src.len(), cells.len())?;
    if cfg!(target_endian = "little") {
        bytemuck::cast_slice_mut::<f64, u8>(cells).copy_from_slice(src);
    } else {
        for (v, chunk) in cells.iter_mut().zip(src.chunks_exact(CELL_BYTES)) {
            let mut b = [0u8; CELL_BYTES];
            b.copy_from_slice(chunk);
            *v = f64::from_le_bytes(b);
        }
    }
    Ok(())
}

fn check_cell_block(bytes: usize, cells: usize) -> Result<(), CodecError> {
    if bytes != cells.saturating_mul(CELL_BYTES) {
        return Err(CodecError::CellCountMismatch {
            expected: bytes / CELL_BYTES,
            found: cells,
        });
    }
    Ok(())
}

// ── Metadata ────────────────────────────────────────────────────

/// Deepest list nesting accepted by the reader and the writer.
pub const MAX_NESTING: usize = 32;

/// Encode the metadata section (entry count followed by entries).
pub fn write_metadata(w: &mut dyn Write, meta: &Metadata) -> Result<(), CodecError> {
    write_count(w, meta.len(), "entries")?;
    for (key, value) in meta.iter() {
        write_length_prefixed_str(w, key)?;
        write_value(w, value, 0)?;
    }
    Ok(())
}

fn write_count(w: &mut dyn Write, n: usize, what: &str) -> Result<(), CodecError> {
    let count = u32::try_from(n).map_err(|_| CodecError::MalformedMetadata {
        detail: format!("{n} {what} exceed u32 count"),
    })?;
    write_u32_le(w, count)
}

fn write_value(w: &mut dyn Write, value: &MetaValue, depth: usize) -> Result<(), CodecError> {
    match value {
        MetaValue::Null => write_u8(w, TAG_NULL)?,
        MetaValue::Bool(b) => {
            write_u8(w, TAG_BOOL)?;
            write_u8(w, u8::from(*b))?;
        }
        MetaValue::Number(n) => {
            write_u8(w, TAG_NUMBER)?;
            write_f64_le(w, *n)?;
        }
        MetaValue::Text(s) => {
            write_u8(w, TAG_TEXT)?;
            write_length_prefixed_str(w, s)?;
        }
        MetaValue::List(items) => {
            if depth >= MAX_NESTING {
                return Err(CodecError::MalformedMetadata {
                    detail: format!("list nesting exceeds {MAX_NESTING}"),
                });
            }
            write_u8(w, TAG_LIST)?;
            write_count(w, items.len(), "list items")?;
            for item in items {
                write_value(w, item, depth + 1)?;
            }
        }
    }
    Ok(())
}

/// Encode the metadata section into a fresh buffer.
pub fn metadata_to_vec(meta: &Metadata) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    write_metadata(&mut buf, meta)?;
    Ok(buf)
}

/// Decode the metadata section.
///
/// Rejects unknown tags, booleans other than 0/1, lists nested deeper than
/// [`MAX_NESTING`], and duplicate keys.
pub fn read_metadata(r: &mut SliceReader<'_>) -> Result<Metadata, CodecError> {
    let count = r.read_u32_le()?;
    let mut meta = Metadata::new();
    for _ in 0..count {
        let key = r.read_length_prefixed_str()?;
        let value = read_value(r, &key, 0)?;
        if meta.get(&key).is_some() {
            return Err(CodecError::MalformedMetadata {
                detail: format!("duplicate key {key:?}"),
            });
        }
        meta.insert(key, value);
    }
    Ok(meta)
}

fn read_value(r: &mut SliceReader<'_>, key: &str, depth: usize) -> Result<MetaValue, CodecError> {
    let value = match r.read_u8()? {
        TAG_NULL => MetaValue::Null,
        TAG_BOOL => match r.read_u8()? {
            0 => MetaValue::Bool(false),
            1 => MetaValue::Bool(true),
            other => {
                return Err(CodecError::MalformedMetadata {
                    detail: format!("key {key:?}: boolean byte {other}"),
                })
            }
        },
        TAG_NUMBER => MetaValue::Number(r.read_f64_le()?),
        TAG_TEXT => MetaValue::Text(r.read_length_prefixed_str()?),
        TAG_LIST => {
            if depth >= MAX_NESTING {
                return Err(CodecError::MalformedMetadata {
                    detail: format!("key {key:?}: list nesting exceeds {MAX_NESTING}"),
                });
            }
            let len = r.read_u32_le()? as usize;
            // Every item takes at least its tag byte.
            if len > r.remaining() {
                return Err(CodecError::Truncated {
                    needed: len,
                    available: r.remaining(),
                });
            }
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(read_value(r, key, depth + 1)?);
            }
            MetaValue::List(items)
        }
        other => {
            return Err(CodecError::MalformedMetadata {
                detail: format!("key {key:?}: unknown value tag {other}"),
            })
        }
    };
    Ok(value)
}
