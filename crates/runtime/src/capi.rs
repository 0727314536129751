//! C ABI shim layer for embedding this library into a host that isn't
//! Rust (an OS kernel, an embedded runtime). Every function here is a
//! thin, panic-free wrapper around the safe API in [`crate::document`],
//! [`crate::value`], and [`crate::patch`]: pointers in, small integer
//! codes out, diagnostics left in the thread-local slot from
//! [`crate::error`] for the host to read.
//!
//! Mirrors the `Box::into_raw`/`Box::from_raw` ownership-handoff idiom and
//! the "return an error code, never panic across the boundary" discipline
//! used throughout this codebase's own FFI surface.

use std::ffi::CStr;
use std::slice;

use libc::{c_char, c_int};

use crate::error::{set_last_error, JsonkError};
use crate::parser::parse as parse_value;
use crate::patch::{apply_patch as apply_patch_bytes, PatchOutcome};
use crate::serializer::serialize;
use crate::value::Value;
use crate::{limits, path};
use jsonk_core::Budget;

// Small negative error codes for mutation/lookup APIs, per the external
// interface's "error signaling" section.
pub const JSONK_OK: c_int = 0;
pub const JSONK_ERR_INVALID_ARGUMENT: c_int = -1;
pub const JSONK_ERR_OUT_OF_MEMORY: c_int = -2;
pub const JSONK_ERR_NO_SUCH_ENTRY: c_int = -3;
pub const JSONK_ERR_TOO_LARGE: c_int = -4;

fn error_code(err: &JsonkError) -> c_int {
    use crate::error::ErrorKind;
    match err.kind {
        ErrorKind::Lookup => JSONK_ERR_NO_SUCH_ENTRY,
        ErrorKind::Resource => JSONK_ERR_OUT_OF_MEMORY,
        ErrorKind::LimitExceeded | ErrorKind::Output => JSONK_ERR_TOO_LARGE,
        ErrorKind::Lexical | ErrorKind::Structural | ErrorKind::Type => JSONK_ERR_INVALID_ARGUMENT,
    }
}

fn report(err: JsonkError) -> c_int {
    let code = error_code(&err);
    set_last_error(&err);
    code
}

/// Outcome codes mirrored for FFI callers of `jsonk_apply_patch`.
pub const JSONK_PATCH_SUCCESS: c_int = 0;
pub const JSONK_PATCH_NO_CHANGE: c_int = 1;
pub const JSONK_PATCH_ERROR_PARSE: c_int = 2;
pub const JSONK_PATCH_ERROR_TYPE: c_int = 3;
pub const JSONK_PATCH_ERROR_MEMORY: c_int = 4;
pub const JSONK_PATCH_ERROR_OVERFLOW: c_int = 5;

fn outcome_code(outcome: PatchOutcome) -> c_int {
    match outcome {
        PatchOutcome::Success => JSONK_PATCH_SUCCESS,
        PatchOutcome::NoChange => JSONK_PATCH_NO_CHANGE,
        PatchOutcome::ErrorParse => JSONK_PATCH_ERROR_PARSE,
        PatchOutcome::ErrorType => JSONK_PATCH_ERROR_TYPE,
        PatchOutcome::ErrorMemory => JSONK_PATCH_ERROR_MEMORY,
        PatchOutcome::ErrorOverflow => JSONK_PATCH_ERROR_OVERFLOW,
    }
}

/// Parse `len` bytes at `bytes` into a new value tree. Returns null and
/// sets the thread-local diagnostic on failure.
///
/// # Safety
/// `bytes` must point to at least `len` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_parse(bytes: *const u8, len: usize) -> *mut Value {
    if bytes.is_null() {
        return std::ptr::null_mut();
    }
    let input = unsafe { slice::from_raw_parts(bytes, len) };
    let budget = Budget::new(limits::MAX_PARSE_MEMORY);
    match parse_value(input, &budget) {
        Ok(value) => Box::into_raw(Box::new(value)),
        Err(err) => {
            set_last_error(&err);
            std::ptr::null_mut()
        }
    }
}

/// Acquire an additional strong reference to `value`, returning a new
/// owned handle the caller must separately release.
///
/// # Safety
/// `value` must be a valid pointer previously returned by this module.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_acquire(value: *const Value) -> *mut Value {
    if value.is_null() {
        return std::ptr::null_mut();
    }
    let cloned = unsafe { (*value).clone() };
    Box::into_raw(Box::new(cloned))
}

/// Release a handle obtained from `jsonk_parse`, `jsonk_acquire`, a typed
/// constructor, or `jsonk_deep_copy`/`jsonk_get_by_path`.
///
/// # Safety
/// `value` must not be used again after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_release(value: *mut Value) {
    if !value.is_null() {
        unsafe { drop(Box::from_raw(value)) };
    }
}

/// Serialize `value` into `buf` (`buf_len` bytes). On success, writes the
/// number of bytes produced to `*written` and returns `JSONK_OK`.
///
/// # Safety
/// `value` must be valid; `buf` must point to `buf_len` writable bytes;
/// `written` must point to a writable `usize`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_serialize(
    value: *const Value,
    buf: *mut u8,
    buf_len: usize,
    written: *mut usize,
) -> c_int {
    if value.is_null() || buf.is_null() || written.is_null() {
        return JSONK_ERR_INVALID_ARGUMENT;
    }
    let out = unsafe { slice::from_raw_parts_mut(buf, buf_len) };
    match serialize(unsafe { &*value }, out) {
        Ok(n) => {
            unsafe { *written = n };
            JSONK_OK
        }
        Err(err) => report(err),
    }
}

/// Apply a merge patch. Returns one of the `JSONK_PATCH_*` codes and, on
/// `JSONK_PATCH_SUCCESS`/`JSONK_PATCH_NO_CHANGE`, writes the result length
/// to `*written`.
///
/// # Safety
/// All pointer/length pairs must describe valid readable/writable memory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_apply_patch(
    target: *const u8,
    target_len: usize,
    patch: *const u8,
    patch_len: usize,
    out_buf: *mut u8,
    out_buf_len: usize,
    written: *mut usize,
) -> c_int {
    if target.is_null() || patch.is_null() || out_buf.is_null() || written.is_null() {
        return JSONK_PATCH_ERROR_TYPE;
    }
    let target_slice = unsafe { slice::from_raw_parts(target, target_len) };
    let patch_slice = unsafe { slice::from_raw_parts(patch, patch_len) };
    let out_slice = unsafe { slice::from_raw_parts_mut(out_buf, out_buf_len) };
    let (outcome, n) = apply_patch_bytes(target_slice, patch_slice, out_slice);
    unsafe { *written = n };
    outcome_code(outcome)
}

/// Look up `path` (a NUL-terminated dot-path) from `root`. Returns null
/// and sets the diagnostic slot on failure.
///
/// # Safety
/// `root` must be valid; `path` must be a valid NUL-terminated C string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_get_by_path(root: *const Value, path: *const c_char) -> *mut Value {
    if root.is_null() || path.is_null() {
        return std::ptr::null_mut();
    }
    let path_str = match unsafe { CStr::from_ptr(path) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };
    match path::get_by_path(unsafe { &*root }, path_str) {
        Ok(value) => Box::into_raw(Box::new(value)),
        Err(err) => {
            set_last_error(&err);
            std::ptr::null_mut()
        }
    }
}

/// Set `path` on `root` to a deep copy of `value`.
///
/// # Safety
/// `root`, `path`, and `value` must be valid as described above.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_set_by_path(
    root: *const Value,
    path: *const c_char,
    value: *const Value,
) -> c_int {
    if root.is_null() || path.is_null() || value.is_null() {
        return JSONK_ERR_INVALID_ARGUMENT;
    }
    let path_str = match unsafe { CStr::from_ptr(path) }.to_str() {
        Ok(s) => s,
        Err(_) => return JSONK_ERR_INVALID_ARGUMENT,
    };
    match path::set_by_path(unsafe { &*root }, path_str, unsafe { &*value }) {
        Ok(()) => JSONK_OK,
        Err(err) => report(err),
    }
}

/// Deep-copy `value` into a fresh, independent tree.
///
/// # Safety
/// `value` must be valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_deep_copy(value: *const Value) -> *mut Value {
    if value.is_null() {
        return std::ptr::null_mut();
    }
    match crate::deep_copy::deep_copy(unsafe { &*value }) {
        Ok(copy) => Box::into_raw(Box::new(copy)),
        Err(err) => {
            set_last_error(&err);
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn jsonk_new_null() -> *mut Value {
    Box::into_raw(Box::new(Value::null()))
}

#[unsafe(no_mangle)]
pub extern "C" fn jsonk_new_bool(v: bool) -> *mut Value {
    Box::into_raw(Box::new(Value::bool(v)))
}

#[unsafe(no_mangle)]
pub extern "C" fn jsonk_new_integer(v: i64) -> *mut Value {
    Box::into_raw(Box::new(Value::integer(v)))
}

/// Construct a string value by copying `len` bytes from `bytes`.
///
/// # Safety
/// `bytes` must point to at least `len` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jsonk_new_string(bytes: *const u8, len: usize) -> *mut Value {
    if bytes.is_null() {
        return Box::into_raw(Box::new(Value::string(Vec::new())));
    }
    let copied = unsafe { slice::from_raw_parts(bytes, len) }.to_vec();
    Box::into_raw(Box::new(Value::string(copied)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serialize_release_roundtrip() {
        let json = br#"{"a":1}"#;
        unsafe {
            let value = jsonk_parse(json.as_ptr(), json.len());
            assert!(!value.is_null());

            let mut buf = [0u8; 32];
            let mut written = 0usize;
            let rc = jsonk_serialize(value, buf.as_mut_ptr(), buf.len(), &mut written);
            assert_eq!(rc, JSONK_OK);
            assert_eq!(&buf[..written], json);

            jsonk_release(value);
        }
    }

    #[test]
    fn parse_failure_sets_diagnostic_and_returns_null() {
        let json = br#"{"a":}"#;
        unsafe {
            let value = jsonk_parse(json.as_ptr(), json.len());
            assert!(value.is_null());
        }
        assert!(crate::error::has_last_error());
        crate::error::clear_last_error();
    }

    #[test]
    fn acquire_bumps_refcount_release_drops_it() {
        let json = br#"1"#;
        unsafe {
            let a = jsonk_parse(json.as_ptr(), json.len());
            assert_eq!((*a).refcount(), 1);
            let b = jsonk_acquire(a);
            assert_eq!((*a).refcount(), 2);
            jsonk_release(b);
            assert_eq!((*a).refcount(), 1);
            jsonk_release(a);
        }
    }

    #[test]
    fn apply_patch_ffi_matches_outcome_codes() {
        let target = br#"{"a":1}"#;
        let patch = br#"{"a":2}"#;
        let mut buf = [0u8; 32];
        let mut written = 0usize;
        unsafe {
            let rc = jsonk_apply_patch(
                target.as_ptr(),
                target.len(),
                patch.as_ptr(),
                patch.len(),
                buf.as_mut_ptr(),
                buf.len(),
                &mut written,
            );
            assert_eq!(rc, JSONK_PATCH_SUCCESS);
            assert_eq!(&buf[..written], br#"{"a":2}"#);
        }
    }

    #[test]
    fn path_ffi_get_and_set() {
        use std::ffi::CString;
        unsafe {
            let root = jsonk_parse(b"{}".as_ptr(), 2);
            let value = jsonk_new_integer(7);
            let path = CString::new("x.y").unwrap();
            let rc = jsonk_set_by_path(root, path.as_ptr(), value);
            assert_eq!(rc, JSONK_OK);

            let found = jsonk_get_by_path(root, path.as_ptr());
            assert!(!found.is_null());
            assert_eq!((*found).as_number().unwrap().as_i64(), 7);

            jsonk_release(found);
            jsonk_release(value);
            jsonk_release(root);
        }
    }
}
