//! # Event Handlers
//!
//! A handler is anything implementing [`EventHandler`]. The bus stores
//! handlers as [`HandlerRef`] values and compares them by allocation
//! identity: two clones of the same `HandlerRef` are the same handler,
//! two `HandlerRef`s built from identical closures are not.

use crate::error::HandlerError;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Receives payloads published under the event it is registered for.
pub trait EventHandler<P>: Send + Sync {
    /// Handle one emission.
    fn handle(&self, payload: &P) -> Result<(), HandlerError>;
}

impl<P, F> EventHandler<P> for F
where
    F: Fn(&P) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, payload: &P) -> Result<(), HandlerError> {
        self(payload)
    }
}

/// Shared, identity-compared reference to a registered handler.
pub struct HandlerRef<P> {
    inner: Arc<dyn EventHandler<P>>,
}

impl<P: 'static> HandlerRef<P> {
    /// Wrap a fallible closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&P) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(handler),
        }
    }

    /// Wrap a closure that cannot fail (it may still panic).
    pub fn infallible<F>(handler: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self::new(move |payload: &P| {
            handler(payload);
            Ok(())
        })
    }

    /// Wrap an already shared handler. Identity is the given allocation.
    pub fn from_arc(inner: Arc<dyn EventHandler<P>>) -> Self {
        Self { inner }
    }
}

impl<P> HandlerRef<P> {
    /// Returns true if both references point at the same handler.
    #[must_use]
    pub fn same_handler(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }

    /// Invoke the handler, converting a panic into [`HandlerError::Panicked`].
    pub(crate) fn invoke(&self, payload: &P) -> Result<(), HandlerError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.inner.handle(payload))) {
            Ok(result) => result,
            Err(panic_payload) => Err(HandlerError::Panicked(panic_message(&*panic_payload))),
        }
    }
}

impl<P> Clone for HandlerRef<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> PartialEq for HandlerRef<P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_handler(other)
    }
}

impl<P> Eq for HandlerRef<P> {}

impl<P> fmt::Debug for HandlerRef<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerRef({:p})", Arc::as_ptr(&self.inner).cast::<()>())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
