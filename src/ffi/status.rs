//! Status codes returned by the native entry points.
//!
//! Zero or positive is success. For buffer calls the value is not
//! meaningful; the written length is reported through the size pointer.

use std::os::raw::c_int;

pub const OK: c_int = 0;
pub const NOT_INITIALIZED: c_int = -1;
pub const FINALIZATION_FAILED: c_int = -2;
pub const CONFIG_READ_FAILED: c_int = -3;
pub const CONFIG_NOT_FOUND: c_int = -5;
pub const CONFIG_DIR_NOT_FOUND: c_int = -6;
pub const METHOD_CALL_FAILED: c_int = -10;

pub fn is_success(code: c_int) -> bool {
    code >= OK
}

/// Whether the error for `code` carries text that must be fetched from the
/// last-error entry point
pub fn needs_last_error(code: c_int) -> bool {
    !is_success(code)
        && !matches!(
            code,
            NOT_INITIALIZED
                | FINALIZATION_FAILED
                | CONFIG_READ_FAILED
                | CONFIG_NOT_FOUND
                | CONFIG_DIR_NOT_FOUND
        )
}
