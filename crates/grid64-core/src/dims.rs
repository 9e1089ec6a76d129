//! Grid dimensions and the element-count arithmetic built on them.

use std::fmt;

/// Width of one grid cell in bytes (`f64`).
pub const CELL_BYTES: usize = std::mem::size_of::<f64>();

/// Height and width of a row-major grid.
///
/// Fields are named rather than positional because the C boundary takes
/// `(width, height)` while most matrix code reads `(rows, cols)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dims {
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl Dims {
    /// The `0x0` grid.
    pub const EMPTY: Dims = Dims {
        height: 0,
        width: 0,
    };

    /// Create dimensions from a row count and a column count.
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Number of cells, or `None` if `height * width` overflows `usize`.
    pub fn checked_count(&self) -> Option<usize> {
        self.height.checked_mul(self.width)
    }

    /// Number of bytes the cells occupy, or `None` on overflow.
    pub fn checked_bytes(&self) -> Option<usize> {
        self.checked_count()?.checked_mul(CELL_BYTES)
    }

    /// Number of cells.
    ///
    /// # Panics
    ///
    /// Panics if `height * width` overflows. Dimensions held by an engine
    /// have always passed [`checked_bytes`](Self::checked_bytes).
    pub fn count(&self) -> usize {
        self.height * self.width
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Row-major index of cell `(row, col)`, or `None` if out of bounds.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}
