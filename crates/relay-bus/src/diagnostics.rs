//! # Diagnostic Sink
//!
//! Where handler failures go. `publish` never returns them; it hands each
//! one to the bus's [`DiagnosticSink`] exactly once and keeps dispatching.

use crate::error::HandlerError;
use parking_lot::Mutex;
use std::fmt;
use tracing::error;

/// One failed handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Identifier of the event being dispatched, rendered with `Display`.
    pub event: String,
    /// What the handler raised.
    pub error: HandlerError,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error occurred while handling event '{}': {}",
            self.event, self.error
        )
    }
}

/// Receives handler failures reported by the bus.
pub trait DiagnosticSink: Send + Sync {
    /// Record one failure. Must not panic.
    fn report(&self, failure: &HandlerFailure);
}

/// Default sink: writes each failure to the `tracing` pipeline at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, failure: &HandlerFailure) {
        error!(
            event = %failure.event,
            error = %failure.error,
            "{}",
            failure
        );
    }
}

/// Sink that keeps failures in memory.
///
/// Useful for hosts that surface failures themselves, and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    failures: Mutex<Vec<HandlerFailure>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far, oldest first.
    #[must_use]
    pub fn failures(&self) -> Vec<HandlerFailure> {
        self.failures.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Drain recorded failures.
    pub fn take(&self) -> Vec<HandlerFailure> {
        std::mem::take(&mut *self.failures.lock())
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, failure: &HandlerFailure) {
        self.failures.lock().push(failure.clone());
    }
}

/// Run `f` with a plain-text `fmt` subscriber and return what it wrote.
#[cfg(test)]
pub(crate) fn capture_logs(f: impl FnOnce()) -> String {
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
