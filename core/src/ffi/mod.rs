//! FFI boundary adapter
//!
//! C-ABI surface of the `cdylib`, as consumed by host bindings (the
//! reference host calls it from R through its C extension interface).
//!
//! # Design Principles
//!
//! 1. **One rich protocol**: failures travel inside the returned result
//!    document's `error` field, not as a bare null, so the host never has
//!    to guess what went wrong
//! 2. **Explicit lifecycle**: every buffer returned by [`beecs_run`] must
//!    be released exactly once via [`beecs_string_free`]
//! 3. **All-or-nothing**: a null return means no buffer was allocated at
//!    all; a non-null return is always a complete document
//! 4. **No unwinding into the host**: a panic inside the engine is a
//!    defect, caught here and reported as a simulation error

use crate::run;
use std::ffi::{c_char, CStr, CString};
use std::panic::{self, AssertUnwindSafe};

/// ABI revision of this boundary. Bumped on any breaking change to the
/// exported symbols or the result document schema.
pub const ABI_VERSION: u32 = 1;

/// Status code: run completed and produced a valid result document.
pub const STATUS_OK: i32 = 0;
/// Status code: internal invariant violation (also covers a caught panic).
pub const STATUS_SIMULATION_ERROR: i32 = 2;
/// Status code: input pointer was null or not valid UTF-8.
pub const STATUS_UNUSABLE_INPUT: i32 = 4;

/// Returns the ABI revision, for host-side compatibility checks.
#[no_mangle]
pub extern "C" fn beecs_abi_version() -> u32 {
    ABI_VERSION
}

/// Runs a simulation from a JSON parameter document and returns the JSON
/// result document as a freshly allocated C string.
///
/// On any pipeline failure the returned document carries the error in its
/// structured `error` field. Null is returned only when no report is
/// possible at all: `params` is null, or not valid UTF-8. Nothing is
/// allocated on the null path.
///
/// The caller owns the returned buffer and must release it exactly once
/// via [`beecs_string_free`]; accessing it after release, or releasing it
/// twice, is undefined behavior.
///
/// # Safety
///
/// The caller must ensure that `params` is either null or a valid
/// NUL-terminated C string that stays alive for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn beecs_run(params: *const c_char) -> *mut c_char {
    if params.is_null() {
        return std::ptr::null_mut();
    }

    let params_json = match CStr::from_ptr(params).to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    let json = match panic::catch_unwind(AssertUnwindSafe(|| run::run_to_json(params_json))) {
        Ok(json) => json,
        Err(_) => run::failure_json("simulation", "internal panic in simulation engine"),
    };

    // serde_json escapes control characters, so the document never holds
    // an interior NUL; the null return here is purely defensive
    match CString::new(json) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Runs the same pipeline as [`beecs_run`] but returns only an integer
/// status, allocating nothing. For minimal host integrations.
///
/// Codes: 0 ok, 1 decode error, 2 simulation error (including a caught
/// panic), 3 encode error, 4 unusable input (null pointer or invalid
/// UTF-8).
///
/// # Safety
///
/// The caller must ensure that `params` is either null or a valid
/// NUL-terminated C string that stays alive for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn beecs_run_status(params: *const c_char) -> i32 {
    if params.is_null() {
        return STATUS_UNUSABLE_INPUT;
    }

    let params_json = match CStr::from_ptr(params).to_str() {
        Ok(s) => s,
        Err(_) => return STATUS_UNUSABLE_INPUT,
    };

    match panic::catch_unwind(AssertUnwindSafe(|| run::run(params_json))) {
        Ok(Ok(_)) => STATUS_OK,
        Ok(Err(err)) => err.code(),
        Err(_) => STATUS_SIMULATION_ERROR,
    }
}

/// Frees a string previously returned by [`beecs_run`].
///
/// Null-tolerant: passing null is a no-op.
///
/// # Safety
///
/// The caller must ensure that `ptr` is either null or a pointer obtained
/// from [`beecs_run`] that has not already been freed.
#[no_mangle]
pub unsafe extern "C" fn beecs_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
