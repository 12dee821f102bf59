//! pptmod-ffi: C-ABI exports for the PPT modulator frame decoder.
//!
//! Host frameworks call [`pptmod_decode`] explicitly; nothing is registered at
//! load time.

mod args;
mod decode;
mod error;
mod types;

use std::panic::AssertUnwindSafe;

pub use decode::{
    pptmod_decode, pptmod_field_count, pptmod_field_name, pptmod_field_offset, pptmod_field_unit,
};
pub use types::{
    PptResult, PPT_ERR_INTERNAL, PPT_ERR_INVALID_ARGUMENT, PPT_ERR_OUTPUT_TOO_SMALL,
    PPT_ERR_TRUNCATED_FRAME, PPT_FRAME_LEN, PPT_OK,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

#[no_mangle]
pub extern "C" fn pptmod_clear_error() {
    ffi_boundary((), || {
        error::clear_error_state();
    });
}

#[no_mangle]
pub extern "C" fn pptmod_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
