//! C ABI for the grid64 buffer engine.
//!
//! One process-global [`Engine`](grid64_engine::Engine) sits behind a
//! mutex and is created on first use with the default configuration. Every
//! entry point catches panics and reports them as
//! [`Grid64Status::Panicked`]; the message is kept per thread and can be
//! read back with [`grid64_last_panic_message`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

use tracing::error;

/// Run `$body` under `catch_unwind`.
///
/// On panic the message is stored in [`LAST_PANIC`] and the fallback is
/// returned: `Grid64Status::Panicked as i32` by default, or the value given
/// with `or`.
macro_rules! ffi_guard {
    (or $fallback:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(v) => v,
            Err(payload) => {
                $crate::record_panic(payload);
                $fallback
            }
        }
    };
    ($body:block) => {
        ffi_guard!(or $crate::status::Grid64Status::Panicked as i32, $body)
    };
}

/// Lock a mutex, returning early from the enclosing closure when it is
/// poisoned: `Grid64Status::InternalError as i32` by default, or the value
/// given with `or`.
macro_rules! ffi_lock {
    ($m:expr, or $fallback:expr) => {
        match $m.lock() {
            Ok(guard) => guard,
            Err(_) => return $fallback,
        }
    };
    ($m:expr) => {
        ffi_lock!($m, or $crate::status::Grid64Status::InternalError as i32)
    };
}

pub mod engine;
pub mod status;

pub use engine::*;
pub use status::Grid64Status;

thread_local! {
    /// Message of the most recent panic caught on this thread.
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn record_panic(payload: Box<dyn Any + Send>) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    };
    error!(message = %msg, "panic caught at FFI boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Copy the last panic message caught on this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator).
/// With a null `buf` or `cap == 0`, only the length is returned. Otherwise
/// at most `cap - 1` bytes are copied and the output is NUL-terminated.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn grid64_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: buf is valid for cap bytes per caller contract and
            // n + 1 <= cap.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        status::len_to_i32(bytes.len())
    })
}
