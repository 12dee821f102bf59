use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::OnceLock;

use pptmod_frame::{FieldSpec, MODULATOR_FIELDS};

use crate::args;
use crate::error;
use crate::types::PptResult;

struct FieldLabels {
    names: Vec<CString>,
    units: Vec<CString>,
}

fn labels() -> &'static FieldLabels {
    static LABELS: OnceLock<FieldLabels> = OnceLock::new();
    LABELS.get_or_init(|| FieldLabels {
        names: MODULATOR_FIELDS.iter().map(|f| c_label(&f.name)).collect(),
        units: MODULATOR_FIELDS.iter().map(|f| c_label(&f.unit)).collect(),
    })
}

fn c_label(text: &str) -> CString {
    CString::new(text.replace('\0', "?")).unwrap_or_default()
}

fn field_at(index: usize) -> Option<&'static FieldSpec> {
    MODULATOR_FIELDS.get(index)
}

/// Decode one frame into `out_values`, one value per field in table order.
///
/// Nothing is written to `out_values` unless the call returns `PptResult::Ok`.
///
/// # Safety
/// If `len > 0`, `data` must be readable for `len` bytes.
/// If `out_len > 0`, `out_values` must be writable for `out_len` doubles.
#[no_mangle]
pub unsafe extern "C" fn pptmod_decode(
    data: *const u8,
    len: usize,
    out_values: *mut f64,
    out_len: usize,
) -> PptResult {
    crate::ffi_boundary(PptResult::Internal, || {
        error::clear_error_state();

        let buf = {
            // SAFETY: We validate pointer/length pairing in helper.
            match unsafe { args::bytes_arg(data, len, "data") } {
                Some(v) => v,
                None => return PptResult::InvalidArgument,
            }
        };
        let out = {
            // SAFETY: We validate pointer/length pairing in helper.
            match unsafe { args::values_out_arg(out_values, out_len, "out_values") } {
                Some(v) => v,
                None => return PptResult::InvalidArgument,
            }
        };

        let decoded = match pptmod_frame::decode(buf) {
            Ok(decoded) => decoded,
            Err(err) => return error::map_decode_error(&err),
        };

        if out.len() < decoded.len() {
            error::set_error_message(format!(
                "out_values holds {} values, need {}",
                out.len(),
                decoded.len()
            ));
            return PptResult::OutputTooSmall;
        }

        for (slot, value) in out.iter_mut().zip(decoded.values()) {
            *slot = value;
        }
        PptResult::Ok
    })
}

/// Number of values written by [`pptmod_decode`].
#[no_mangle]
pub extern "C" fn pptmod_field_count() -> usize {
    crate::ffi_boundary(0, || MODULATOR_FIELDS.len())
}

/// Name of the field at `index`, or null when out of range.
///
/// The string is owned by the library and lives for the whole process.
#[no_mangle]
pub extern "C" fn pptmod_field_name(index: usize) -> *const c_char {
    crate::ffi_boundary(std::ptr::null(), || {
        labels()
            .names
            .get(index)
            .map_or(std::ptr::null(), |name| name.as_ptr())
    })
}

/// Unit of the field at `index` (empty for bitfields), or null when out of range.
#[no_mangle]
pub extern "C" fn pptmod_field_unit(index: usize) -> *const c_char {
    crate::ffi_boundary(std::ptr::null(), || {
        labels()
            .units
            .get(index)
            .map_or(std::ptr::null(), |unit| unit.as_ptr())
    })
}

/// Byte offset of the field at `index`, or -1 when out of range.
#[no_mangle]
pub extern "C" fn pptmod_field_offset(index: usize) -> isize {
    crate::ffi_boundary(-1, || field_at(index).map_or(-1, |f| f.offset as isize))
}
