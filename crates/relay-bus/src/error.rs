//! Handler error types.

use thiserror::Error;

/// Failure raised by a single handler invocation.
///
/// This is the only error kind the bus knows about. It never escapes
/// `publish`: the bus catches it, reports it to the diagnostic sink and
/// moves on to the next handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("{0}")]
    Failed(String),

    /// The handler panicked; the panic was caught at the dispatch boundary.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Build a [`HandlerError::Failed`] from any message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::Failed(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::Failed(message.to_string())
    }
}
