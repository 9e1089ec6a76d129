//! Engine entry points.
//!
//! Counts and lengths come back as non-negative `i32`, failures as a
//! negative [`Grid64Status`]. Pointers returned here stay valid until the
//! next call that may reallocate the arena (resize, serialize, decode,
//! clear, stage, reset).

use std::sync::{Mutex, PoisonError};

use grid64_core::{Dims, GridError};
use grid64_engine::{Engine, EngineConfig};

use crate::status::{len_to_i32, Grid64Status};

static ENGINE: Mutex<Option<Engine>> = Mutex::new(None);

/// The global engine, created with the default configuration on first use.
fn ensure(slot: &mut Option<Engine>) -> Result<&mut Engine, Grid64Status> {
    if slot.is_none() {
        let engine = Engine::new(EngineConfig::default())
            .map_err(|_| Grid64Status::InternalError)?;
        *slot = Some(engine);
    }
    slot.as_mut().ok_or(Grid64Status::InternalError)
}

fn status_of(e: &GridError) -> i32 {
    Grid64Status::from(e) as i32
}

/// Resize the grid to `height` rows of `width` columns.
///
/// Cells inside both the old and new bounds keep their values; new cells
/// are set to `fill`. Returns the arena capacity in bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_resize(width: i32, height: i32, fill: f64) -> i32 {
    ffi_guard!({
        let (Ok(width), Ok(height)) = (usize::try_from(width), usize::try_from(height)) else {
            return Grid64Status::InvalidDimensions as i32;
        };
        let mut guard = ffi_lock!(ENGINE);
        let engine = match ensure(&mut guard) {
            Ok(e) => e,
            Err(s) => return s as i32,
        };
        match engine.resize(Dims::new(height, width), fill) {
            Ok(capacity) => len_to_i32(capacity),
            Err(e) => status_of(&e),
        }
    })
}

/// Number of rows, 0 when no grid is held.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_height() -> i64 {
    ffi_guard!(or 0, {
        let guard = ffi_lock!(ENGINE, or 0);
        guard
            .as_ref()
            .map_or(0, |e| i64::try_from(e.height()).unwrap_or(i64::MAX))
    })
}

/// Number of columns, 0 when no grid is held.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_width() -> i64 {
    ffi_guard!(or 0, {
        let guard = ffi_lock!(ENGINE, or 0);
        guard
            .as_ref()
            .map_or(0, |e| i64::try_from(e.width()).unwrap_or(i64::MAX))
    })
}

/// Pointer to the first cell, null when the arena is empty.
///
/// Valid for [`grid64_data_count`] `f64` values.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_data_offset() -> *mut f64 {
    ffi_guard!(or std::ptr::null_mut(), {
        let mut guard = ffi_lock!(ENGINE, or std::ptr::null_mut());
        match guard.as_mut() {
            Some(engine) => {
                let offset = engine.data_offset();
                engine.base_ptr().wrapping_add(offset).cast::<f64>()
            }
            None => std::ptr::null_mut(),
        }
    })
}

/// Number of cells, `height * width`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_data_count() -> i32 {
    ffi_guard!({
        let guard = ffi_lock!(ENGINE);
        guard.as_ref().map_or(0, |e| len_to_i32(e.data_count()))
    })
}

/// Sum of all cells; NaN when no grid is held or any cell is NaN.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_sum() -> f64 {
    ffi_guard!(or f64::NAN, {
        let guard = ffi_lock!(ENGINE, or f64::NAN);
        guard.as_ref().map_or(f64::NAN, Engine::sum)
    })
}

fn serialize_with(init: bool) -> i32 {
    ffi_guard!({
        let mut guard = ffi_lock!(ENGINE);
        let engine = match ensure(&mut guard) {
            Ok(e) => e,
            Err(s) => return s as i32,
        };
        let result = if init {
            engine.serialize_init()
        } else {
            engine.serialize()
        };
        match result {
            Ok(len) => len_to_i32(len),
            Err(e) => status_of(&e),
        }
    })
}

/// Serialize the grid, recomputing setup. Returns the encoded length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_serialize_init() -> i32 {
    serialize_with(true)
}

/// Serialize the grid, reusing setup when possible. Returns the encoded
/// length; the bytes match [`grid64_serialize_init`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_serialize() -> i32 {
    serialize_with(false)
}

/// Pointer to the serialized region, null when none is retained.
///
/// Valid for [`grid64_serialized_len`] bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_serialized_offset() -> *const u8 {
    ffi_guard!(or std::ptr::null(), {
        let mut guard = ffi_lock!(ENGINE, or std::ptr::null());
        match guard.as_mut() {
            Some(engine) => match engine.serialized_offset() {
                Some(offset) => engine.base_ptr().wrapping_add(offset).cast_const(),
                None => std::ptr::null(),
            },
            None => std::ptr::null(),
        }
    })
}

/// Length of the serialized region in bytes, 0 when none is retained.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_serialized_len() -> i32 {
    ffi_guard!({
        let guard = ffi_lock!(ENGINE);
        guard.as_ref().map_or(0, |e| len_to_i32(e.serialized_len()))
    })
}

/// Reserve `len` zeroed bytes as the serialized region for the caller to
/// fill. Returns null on a negative length or allocation failure.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_stage_serialized(len: i32) -> *mut u8 {
    ffi_guard!(or std::ptr::null_mut(), {
        let Ok(len) = usize::try_from(len) else {
            return std::ptr::null_mut();
        };
        let mut guard = ffi_lock!(ENGINE, or std::ptr::null_mut());
        let Ok(engine) = ensure(&mut guard) else {
            return std::ptr::null_mut();
        };
        match engine.stage_serialized(len) {
            Ok(bytes) => bytes.as_mut_ptr(),
            Err(_) => std::ptr::null_mut(),
        }
    })
}

/// Release the grid slot. Returns 1 if a grid was released, 0 if the slot
/// was already empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_clear_decoded() -> i32 {
    ffi_guard!({
        let mut guard = ffi_lock!(ENGINE);
        match guard.as_mut() {
            Some(engine) => i32::from(engine.clear_decoded()),
            None => 0,
        }
    })
}

/// Decode the serialized region, which must hold exactly `expected_count`
/// cells. Returns the decoded count.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_decode(expected_count: i32) -> i32 {
    ffi_guard!({
        let Ok(expected) = usize::try_from(expected_count) else {
            return Grid64Status::InvalidArgument as i32;
        };
        let mut guard = ffi_lock!(ENGINE);
        let engine = match ensure(&mut guard) {
            Ok(e) => e,
            Err(s) => return s as i32,
        };
        match engine.decode(expected) {
            Ok(count) => len_to_i32(count),
            Err(e) => status_of(&e),
        }
    })
}

/// Relabel the grid as `height` rows of `width` columns without touching
/// its cells. `width * height` must equal the current cell count.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_set_dim(width: i64, height: i64) -> i32 {
    ffi_guard!({
        let (Ok(width), Ok(height)) = (usize::try_from(width), usize::try_from(height)) else {
            return Grid64Status::InvalidDimensions as i32;
        };
        let mut guard = ffi_lock!(ENGINE);
        let engine = match ensure(&mut guard) {
            Ok(e) => e,
            Err(s) => return s as i32,
        };
        match engine.set_dims(Dims::new(height, width)) {
            Ok(()) => Grid64Status::Ok as i32,
            Err(e) => status_of(&e),
        }
    })
}

/// Drop the global engine and release its arena. Also recovers from a
/// poisoned lock left by an earlier panic.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_reset() -> i32 {
    ffi_guard!({
        let mut guard = ENGINE.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        drop(guard);
        ENGINE.clear_poison();
        Grid64Status::Ok as i32
    })
}
