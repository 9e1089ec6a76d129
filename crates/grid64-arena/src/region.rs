//! Byte regions addressed by offset into the arena.

use std::ops::Range;

/// A `(offset, len)` window into the arena, in bytes.
///
/// Regions are plain values. They carry no borrow and stay meaningful only
/// until the arena relocates or the owning component reassigns the space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    /// Start of the region in bytes from the arena base.
    pub offset: usize,
    /// Length of the region in bytes.
    pub len: usize,
}

impl Region {
    /// Create a region.
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// One past the last byte, or `None` on overflow.
    pub fn checked_end(&self) -> Option<usize> {
        self.offset.checked_add(self.len)
    }

    /// Byte range covered by the region. The end must not overflow; see
    /// [`checked_end`](Self::checked_end).
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    /// True when both the start and the length are multiples of 8.
    pub fn is_word_aligned(&self) -> bool {
        self.offset % 8 == 0 && self.len % 8 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_covers_offset_to_end() {
        let r = Region::new(16, 24);
        assert_eq!(r.range(), 16..40);
        assert!(r.is_word_aligned());
    }

    #[test]
    fn misaligned_regions_detected() {
        assert!(!Region::new(4, 8).is_word_aligned());
        assert!(!Region::new(8, 12).is_word_aligned());
    }

    #[test]
    fn checked_end_detects_overflow() {
        assert_eq!(Region::new(usize::MAX, 1).checked_end(), None);
    }
}
