//! The growable storage arena.
//!
//! An [`Arena`] is a single `Vec<u64>` viewed as bytes or as `f64`. Using
//! `u64` words as the backing element guarantees 8-byte alignment of the
//! base address, so any 8-aligned [`Region`] can be reinterpreted as
//! `&[f64]` through `bytemuck` without copying.

use std::fmt;

use tracing::{debug, trace};

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::region::Region;

const WORD: usize = std::mem::size_of::<u64>();

/// A single contiguous, growable, 8-byte aligned byte region.
///
/// All content below the current size is preserved across growth. Growth
/// may move the backing storage; [`generation`](Self::generation) records
/// every such move.
pub struct Arena {
    words: Vec<u64>,
    config: ArenaConfig,
    generation: u32,
}

impl Arena {
    /// Create an arena, allocating `config.initial_bytes` (rounded up to 8).
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let mut arena = Self {
            words: Vec::new(),
            config,
            generation: 0,
        };
        if arena.config.initial_bytes > 0 {
            let initial = round_up(arena.config.initial_bytes);
            arena.grow_words(initial / WORD, initial)?;
        }
        Ok(arena)
    }

    /// Offset of the first byte. Arena offsets are relative, so this is 0.
    pub fn base_offset(&self) -> usize {
        0
    }

    /// Current size in bytes. Always a multiple of 8.
    pub fn size(&self) -> usize {
        self.words.len() * WORD
    }

    /// Configured hard limit in bytes.
    pub fn limit(&self) -> usize {
        self.config.max_bytes
    }

    /// Number of times the backing storage has moved.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Grow the arena so that it holds at least `bytes` bytes.
    ///
    /// Returns the size after the call. Growth is amortized: the new size is
    /// at least double the old one and at least `min_growth_bytes` larger,
    /// clamped to the configured limit. Existing content is preserved; new
    /// bytes are zero.
    ///
    /// # Errors
    ///
    /// [`ArenaError::CapacityExceeded`] if `bytes` is above the limit or the
    /// allocator cannot satisfy the request. The arena is unchanged.
    pub fn ensure_capacity(&mut self, bytes: usize) -> Result<usize, ArenaError> {
        let size = self.size();
        if bytes <= size {
            return Ok(size);
        }
        let limit = self.config.max_bytes;
        if bytes > limit {
            return Err(ArenaError::CapacityExceeded {
                requested: bytes,
                limit,
            });
        }
        let target = round_up(bytes)
            .max(size.saturating_mul(2))
            .max(size.saturating_add(self.config.min_growth_bytes))
            .min(limit);
        self.grow_words(target / WORD, bytes)?;
        Ok(self.size())
    }

    /// Shrink the arena to `bytes` (rounded up to 8) and release the excess.
    ///
    /// Content below the new size is preserved. Shrinking may move the
    /// backing storage. Requests at or above the current size are no-ops.
    pub fn shrink_to(&mut self, bytes: usize) {
        let words = round_up(bytes) / WORD;
        if words >= self.words.len() {
            return;
        }
        let before = self.words.as_ptr();
        self.words.truncate(words);
        self.words.shrink_to_fit();
        if self.words.as_ptr() != before {
            self.generation = self.generation.wrapping_add(1);
        }
        debug!(size = self.size(), generation = self.generation, "arena shrunk");
    }

    /// The whole arena as bytes.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// The whole arena as mutable bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.words)
    }

    /// Bytes covered by `region`.
    pub fn region_bytes(&self, region: Region) -> Result<&[u8], ArenaError> {
        let range = self.check(region)?;
        Ok(&self.bytes()[range])
    }

    /// Mutable bytes covered by `region`.
    pub fn region_bytes_mut(&mut self, region: Region) -> Result<&mut [u8], ArenaError> {
        let range = self.check(region)?;
        Ok(&mut self.bytes_mut()[range])
    }

    /// Zero-copy `f64` view over an 8-aligned region.
    pub fn f64s(&self, region: Region) -> Result<&[f64], ArenaError> {
        let words = self.check_words(region)?;
        Ok(bytemuck::cast_slice(&self.words[words]))
    }

    /// Zero-copy mutable `f64` view over an 8-aligned region.
    pub fn f64s_mut(&mut self, region: Region) -> Result<&mut [f64], ArenaError> {
        let words = self.check_words(region)?;
        Ok(bytemuck::cast_slice_mut(&mut self.words[words]))
    }

    /// Split the arena at an 8-aligned byte offset into an `f64` head and a
    /// byte tail.
    ///
    /// This is how the grid cells (always at offset 0) and the serialized
    /// region (always after them) are borrowed at the same time.
    pub fn split_cells_mut(&mut self, mid: usize) -> Result<(&mut [f64], &mut [u8]), ArenaError> {
        if mid % WORD != 0 {
            return Err(ArenaError::Misaligned {
                offset: mid,
                len: 0,
            });
        }
        if mid > self.size() {
            return Err(ArenaError::OutOfBounds {
                offset: mid,
                len: 0,
                size: self.size(),
            });
        }
        let (head, tail) = self.words.split_at_mut(mid / WORD);
        Ok((
            bytemuck::cast_slice_mut(head),
            bytemuck::cast_slice_mut(tail),
        ))
    }

    /// Copy the bytes of `src` so they start at `dest`. Ranges may overlap.
    pub fn copy_within(&mut self, src: Region, dest: usize) -> Result<(), ArenaError> {
        let range = self.check(src)?;
        self.check(Region::new(dest, src.len))?;
        self.bytes_mut().copy_within(range, dest);
        trace!(from = src.offset, to = dest, len = src.len, "arena copy");
        Ok(())
    }

    /// Raw base pointer for the C boundary.
    ///
    /// Valid for reads and writes of [`size`](Self::size) bytes until the
    /// next call that changes [`generation`](Self::generation).
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.words.as_mut_ptr().cast()
    }

    fn grow_words(&mut self, words: usize, requested: usize) -> Result<(), ArenaError> {
        let before = self.words.as_ptr();
        let additional = words - self.words.len();
        self.words
            .try_reserve_exact(additional)
            .map_err(|_| ArenaError::CapacityExceeded {
                requested,
                limit: self.config.max_bytes,
            })?;
        self.words.resize(words, 0);
        if self.words.as_ptr() != before {
            self.generation = self.generation.wrapping_add(1);
        }
        debug!(
            size = self.size(),
            requested,
            generation = self.generation,
            "arena grown"
        );
        Ok(())
    }

    fn check(&self, region: Region) -> Result<std::ops::Range<usize>, ArenaError> {
        match region.checked_end() {
            Some(end) if end <= self.size() => Ok(region.range()),
            _ => Err(ArenaError::OutOfBounds {
                offset: region.offset,
                len: region.len,
                size: self.size(),
            }),
        }
    }

    fn check_words(&self, region: Region) -> Result<std::ops::Range<usize>, ArenaError> {
        if !region.is_word_aligned() {
            return Err(ArenaError::Misaligned {
                offset: region.offset,
                len: region.len,
            });
        }
        let range = self.check(region)?;
        Ok(range.start / WORD..range.end / WORD)
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("size", &self.size())
            .field("limit", &self.config.max_bytes)
            .field("generation", &self.generation)
            .finish()
    }
}

fn round_up(bytes: usize) -> usize {
    bytes.div_ceil(WORD).saturating_mul(WORD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arena(max: usize) -> Arena {
        Arena::new(ArenaConfig {
            initial_bytes: 0,
            min_growth_bytes: 64,
            max_bytes: max,
        })
        .unwrap()
    }

    #[test]
    fn new_arena_is_empty() {
        let a = arena(1024);
        assert_eq!(a.size(), 0);
        assert_eq!(a.base_offset(), 0);
        assert_eq!(a.generation(), 0);
    }

    #[test]
    fn initial_bytes_are_allocated_and_rounded() {
        let a = Arena::new(ArenaConfig {
            initial_bytes: 13,
            ..ArenaConfig::default()
        })
        .unwrap();
        assert_eq!(a.size(), 16);
    }

    #[test]
    fn growth_is_at_least_requested() {
        let mut a = arena(1 << 20);
        let size = a.ensure_capacity(100).unwrap();
        assert!(size >= 100);
        assert_eq!(size % 8, 0);
    }

    #[test]
    fn growth_doubles() {
        let mut a = arena(1 << 20);
        a.ensure_capacity(1000).unwrap();
        let first = a.size();
        a.ensure_capacity(first + 1).unwrap();
        assert!(a.size() >= first * 2);
    }

    #[test]
    fn growth_is_clamped_to_limit() {
        let mut a = arena(1024);
        a.ensure_capacity(600).unwrap();
        let size = a.ensure_capacity(1000).unwrap();
        assert_eq!(size, 1024);
    }

    #[test]
    fn request_above_limit_fails_and_leaves_arena_untouched() {
        let mut a = arena(1024);
        a.ensure_capacity(64).unwrap();
        a.bytes_mut()[0] = 0xAB;
        let size = a.size();
        let generation = a.generation();

        let err = a.ensure_capacity(2048).unwrap_err();
        assert_eq!(
            err,
            ArenaError::CapacityExceeded {
                requested: 2048,
                limit: 1024
            }
        );
        assert_eq!(a.size(), size);
        assert_eq!(a.generation(), generation);
        assert_eq!(a.bytes()[0], 0xAB);
    }

    #[test]
    fn growth_preserves_content() {
        let mut a = arena(1 << 20);
        a.ensure_capacity(16).unwrap();
        a.f64s_mut(Region::new(0, 16))
            .unwrap()
            .copy_from_slice(&[1.5, -2.5]);
        a.ensure_capacity(10_000).unwrap();
        assert_eq!(a.f64s(Region::new(0, 16)).unwrap(), &[1.5, -2.5]);
    }

    #[test]
    fn new_bytes_are_zero() {
        let mut a = arena(1 << 20);
        a.ensure_capacity(256).unwrap();
        assert!(a.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn misaligned_typed_view_rejected() {
        let mut a = arena(1024);
        a.ensure_capacity(64).unwrap();
        assert!(matches!(
            a.f64s(Region::new(4, 8)),
            Err(ArenaError::Misaligned { .. })
        ));
    }

    #[test]
    fn out_of_bounds_region_rejected() {
        let mut a = arena(1024);
        a.ensure_capacity(64).unwrap();
        let size = a.size();
        assert!(matches!(
            a.region_bytes(Region::new(size - 8, 16)),
            Err(ArenaError::OutOfBounds { .. })
        ));
        assert!(matches!(
            a.region_bytes(Region::new(usize::MAX, 2)),
            Err(ArenaError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn copy_within_handles_overlap() {
        let mut a = arena(1024);
        a.ensure_capacity(64).unwrap();
        for (i, b) in a.bytes_mut()[..8].iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        a.copy_within(Region::new(0, 8), 4).unwrap();
        assert_eq!(&a.bytes()[..12], &[1, 2, 3, 4, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn split_cells_mut_borrows_both_halves() {
        let mut a = arena(1024);
        a.ensure_capacity(64).unwrap();
        let size = a.size();
        let (cells, tail) = a.split_cells_mut(16).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(tail.len(), size - 16);
        cells[1] = 7.0;
        tail[0] = 9;
        assert_eq!(a.f64s(Region::new(8, 8)).unwrap(), &[7.0]);
        assert_eq!(a.bytes()[16], 9);
    }

    #[test]
    fn split_cells_mut_rejects_unaligned_mid() {
        let mut a = arena(1024);
        a.ensure_capacity(64).unwrap();
        assert!(a.split_cells_mut(3).is_err());
        assert!(a.split_cells_mut(128).is_err());
    }

    #[test]
    fn shrink_releases_tail_and_keeps_head() {
        let mut a = arena(1 << 20);
        a.ensure_capacity(4096).unwrap();
        a.bytes_mut()[5] = 42;
        a.shrink_to(10);
        assert_eq!(a.size(), 16);
        assert_eq!(a.bytes()[5], 42);
    }

    #[test]
    fn shrink_above_size_is_noop() {
        let mut a = arena(1024);
        a.ensure_capacity(64).unwrap();
        a.shrink_to(512);
        assert_eq!(a.size(), 64);
    }

    proptest! {
        #[test]
        fn ensure_capacity_never_shrinks(reqs in prop::collection::vec(0usize..100_000, 1..16)) {
            let mut a = arena(1 << 20);
            let mut last = 0;
            for r in reqs {
                let size = a.ensure_capacity(r).unwrap();
                prop_assert!(size >= r);
                prop_assert!(size >= last);
                prop_assert_eq!(size % 8, 0);
                last = size;
            }
        }
    }
}
