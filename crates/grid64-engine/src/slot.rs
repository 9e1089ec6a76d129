//! The single grid slot and the in-place reshape it performs on resize.

use grid64_core::Dims;

/// Lifecycle state of the grid slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Never populated.
    #[default]
    Uninit,
    /// Populated by `resize`.
    Live,
    /// Populated by `decode`.
    Decoded,
    /// Explicitly released by `clear_decoded`.
    Cleared,
}

impl SlotState {
    /// True for `Live` and `Decoded`.
    pub fn is_populated(self) -> bool {
        matches!(self, Self::Live | Self::Decoded)
    }
}

/// Slot state plus the dimensions of the grid it holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GridSlot {
    pub(crate) state: SlotState,
    pub(crate) dims: Dims,
}

impl GridSlot {
    /// Dimensions of the held grid, `0x0` when unpopulated.
    pub(crate) fn dims(&self) -> Dims {
        if self.state.is_populated() {
            self.dims
        } else {
            Dims::EMPTY
        }
    }

    pub(crate) fn populate(&mut self, state: SlotState, dims: Dims) {
        self.state = state;
        self.dims = dims;
    }

    pub(crate) fn release(&mut self) {
        self.state = SlotState::Cleared;
        self.dims = Dims::EMPTY;
    }
}

/// Rearrange a row-major grid from `old` to `new` dimensions in place.
///
/// Every cell `(r, c)` inside both bounds keeps its value; every other cell
/// of the new grid is set to `fill`. `cells` must hold at least
/// `max(old.count(), new.count())` values.
pub(crate) fn reshape_in_place(cells: &mut [f64], old: Dims, new: Dims, fill: f64) {
    debug_assert!(cells.len() >= old.count().max(new.count()));
    let kept_rows = old.height.min(new.height);
    let kept_cols = old.width.min(new.width);

    if new.width > old.width {
        // Rows move towards the end; walk backwards so no source row is
        // overwritten before it is moved.
        for r in (0..kept_rows).rev() {
            let src = r * old.width;
            let dst = r * new.width;
            cells.copy_within(src..src + kept_cols, dst);
            cells[dst + kept_cols..dst + new.width].fill(fill);
        }
    } else if new.width < old.width {
        for r in 0..kept_rows {
            let src = r * old.width;
            let dst = r * new.width;
            cells.copy_within(src..src + kept_cols, dst);
        }
    }

    cells[kept_rows * new.width..new.count()].fill(fill);
}
