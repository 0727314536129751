//! Error types and thread-local diagnostic state.
//!
//! Internal code returns [`JsonkError`] through `Result`. The public API
//! additionally mirrors the active error into a thread-local "last
//! diagnostic" slot (mirroring the error module's usual approach of
//! thread-local state plus FFI-safe accessors) so a host embedding this
//! library through the C ABI can retrieve a human-readable message without
//! the crate panicking or allocating across the FFI boundary.

use std::cell::RefCell;
use std::ffi::CString;
use std::fmt;
use std::ptr;

use crate::diagnostic::{DiagnosticSink, Severity, ThreadLocalSink};

/// A classification of failure, independent of any particular operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed JSON at the byte level.
    Lexical,
    /// Well-formed tokens in an illegal arrangement (unexpected token,
    /// missing `:`/`,`, unterminated container).
    Structural,
    /// A configured limit (depth, size, length) was exceeded.
    LimitExceeded,
    /// An allocation failed or a per-parse budget was exhausted.
    Resource,
    /// A value was not of the type an operation required.
    Type,
    /// A destination buffer was too small to hold a result.
    Output,
    /// A dot-path component was missing or resolved through a non-object.
    Lookup,
}

/// The error type returned by fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonkError {
    pub kind: ErrorKind,
    pub message: String,
    /// Byte offset into the input at which the error was detected, when
    /// applicable (parsing/lexing errors).
    pub offset: Option<usize>,
}

impl JsonkError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        JsonkError {
            kind,
            message: message.into(),
            offset: None,
        }
    }

    pub fn at(kind: ErrorKind, message: impl Into<String>, offset: usize) -> Self {
        JsonkError {
            kind,
            message: message.into(),
            offset: Some(offset),
        }
    }
}

impl fmt::Display for JsonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{:?} at byte {}: {}", self.kind, offset, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for JsonkError {}

pub type Result<T> = std::result::Result<T, JsonkError>;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
    static ERROR_CSTRING: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record `err` as the current thread's last diagnostic, for hosts polling
/// through the FFI surface rather than checking a `Result` directly. Also
/// emits through the default [`ThreadLocalSink`], so a host that never
/// installs its own `DiagnosticSink` still observes every public-API
/// failure as an `Error`-severity diagnostic.
pub fn set_last_error(err: &JsonkError) {
    ERROR_CSTRING.with(|cs| *cs.borrow_mut() = None);
    let message = err.to_string();
    ThreadLocalSink.emit(Severity::Error, &message);
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(message));
}

pub fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
    ERROR_CSTRING.with(|cs| *cs.borrow_mut() = None);
}

pub fn has_last_error() -> bool {
    LAST_ERROR.with(|e| e.borrow().is_some())
}

pub fn take_last_error() -> Option<String> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// FFI-safe: returns a pointer valid until the next call into this module's
/// error accessors. Null if no diagnostic is pending.
#[unsafe(no_mangle)]
pub extern "C" fn jsonk_has_error() -> bool {
    has_last_error()
}

#[unsafe(no_mangle)]
pub extern "C" fn jsonk_get_error() -> *const libc::c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(msg) => ERROR_CSTRING.with(|cs| {
            let safe_msg: String = msg.chars().map(|c| if c == '\0' { '?' } else { c }).collect();
            let cstring = CString::new(safe_msg).expect("null bytes already replaced");
            let ptr = cstring.as_ptr();
            *cs.borrow_mut() = Some(cstring);
            ptr
        }),
        None => ptr::null(),
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn jsonk_clear_error() {
    clear_last_error();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_take_error_roundtrip() {
        clear_last_error();
        assert!(!has_last_error());
        let err = JsonkError::at(ErrorKind::Lexical, "unexpected byte", 12);
        set_last_error(&err);
        assert!(has_last_error());
        let msg = take_last_error().unwrap();
        assert!(msg.contains("unexpected byte"));
        assert!(!has_last_error());
    }

    #[test]
    fn clear_error_empties_slot() {
        set_last_error(&JsonkError::new(ErrorKind::Type, "not an object"));
        clear_last_error();
        assert!(!has_last_error());
        assert!(take_last_error().is_none());
    }

    #[test]
    fn display_includes_offset_when_present() {
        let err = JsonkError::at(ErrorKind::Structural, "expected ','", 7);
        assert_eq!(format!("{err}"), "Structural at byte 7: expected ','");
    }
}
