//! Diagnostic output is an external collaborator, not a logging
//! dependency: the host implements [`DiagnosticSink`] however it wants
//! (kernel log ring, a host-side tracing span, or nothing at all) and
//! this crate just calls `emit` on whatever sink is installed.

use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

pub trait DiagnosticSink {
    fn emit(&self, severity: Severity, message: &str);
}

/// Discards everything. The default sink when a host doesn't care.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _severity: Severity, _message: &str) {}
}

/// Records the single most recent message per thread, mirroring the
/// crate's own thread-local "last error" state. Useful for a host that
/// polls rather than installing a callback.
pub struct ThreadLocalSink;

thread_local! {
    static LAST_DIAGNOSTIC: RefCell<Option<(Severity, String)>> = const { RefCell::new(None) };
}

impl DiagnosticSink for ThreadLocalSink {
    fn emit(&self, severity: Severity, message: &str) {
        LAST_DIAGNOSTIC.with(|slot| {
            *slot.borrow_mut() = Some((severity, message.to_string()));
        });
    }
}

pub fn take_last_diagnostic() -> Option<(Severity, String)> {
    LAST_DIAGNOSTIC.with(|slot| slot.borrow_mut().take())
}
