//! Binary codec for grid64 grids.
//!
//! Encodes a grid (dimensions, cells, metadata) into a compact,
//! self-describing byte sequence and validates/decodes it back. The codec
//! works on caller-provided slices so the engine can encode directly into
//! its arena and decode directly out of it.
//!
//! # Format (version 1, all integers little-endian)
//!
//! ```text
//! [MAGIC "GR64"] [VERSION u8] [FLAGS u8] [RESERVED u16 = 0]
//! [HEIGHT u64] [WIDTH u64]                      -- 24-byte header
//! [CELL f64] x height*width                     -- row-major
//! [META_COUNT u32] [KEY str] [TAG u8] [VALUE]...
//! [CHECKSUM u64]                                -- FNV-1a of all prior bytes
//! ```
//!
//! Cells start at byte 24, so a region placed at an 8-aligned offset has
//! 8-aligned cells as well.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod grid;
pub mod hash;
pub mod header;

pub use error::CodecError;
pub use grid::{
    decode_from_slice, encode_into, encode_to_vec, encoded_len, inspect, DecodedGrid, Inspected,
};
pub use hash::checksum;
pub use header::Header;

/// Magic bytes at the start of every encoding.
pub const MAGIC: [u8; 4] = *b"GR64";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 24;

/// Size of the trailing checksum in bytes.
pub const CHECKSUM_LEN: usize = 8;

/// Header flag: the encoded slot held a populated grid.
///
/// An encoding without this flag describes an engine that had no data
/// (never resized, or cleared); decoding it yields an empty slot rather than
/// a `0x0` grid.
pub const FLAG_POPULATED: u8 = 0x01;
