//! # Event Bus
//!
//! Synchronous, in-process publish/subscribe.
//!
//! ## Rules
//!
//! - **Ordered**: handlers run in registration order.
//! - **Duplicate-free**: subscribing the same [`HandlerRef`] twice to one
//!   event is a no-op.
//! - **Snapshot dispatch**: `publish` copies the handler sequence, releases
//!   the lock, then walks the copy. Handlers added mid-pass wait for the
//!   next pass; handlers removed mid-pass still run if they were in the copy.
//! - **Fault isolation**: an error or panic in one handler is reported to
//!   the [`DiagnosticSink`] and never stops the rest of the pass.

use crate::diagnostics::{DiagnosticSink, HandlerFailure, TracingSink};
use crate::handler::HandlerRef;
use crate::once::OnceHandler;
use crate::registry::Registry;
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::fmt::{self, Display};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct BusStats {
    events_published: AtomicU64,
    handler_failures: AtomicU64,
}

/// In-process event bus keyed by `K`, carrying payloads of type `P`.
///
/// Cloning is cheap and every clone shares the same registry.
pub struct EventBus<K, P> {
    registry: Arc<RwLock<Registry<K, P>>>,
    sink: Arc<dyn DiagnosticSink>,
    stats: Arc<BusStats>,
}

impl<K, P> EventBus<K, P>
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    P: 'static,
{
    /// Create an empty bus that reports handler failures through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// Create an empty bus that reports handler failures to `sink`.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::new())),
            sink,
            stats: Arc::new(BusStats::default()),
        }
    }

    /// Register `handler` for `event`.
    ///
    /// Appends to the end of the event's sequence. Re-registering a handler
    /// that is already there does nothing.
    pub fn subscribe(&self, event: K, handler: HandlerRef<P>) {
        let label = event.to_string();
        if self.registry.write().insert(event, handler) {
            debug!(event = %label, "Handler subscribed");
        } else {
            trace!(event = %label, "Handler already subscribed, ignoring");
        }
    }

    /// Alias of [`subscribe`](Self::subscribe).
    pub fn on(&self, event: K, handler: HandlerRef<P>) {
        self.subscribe(event, handler);
    }

    /// Remove `handler` from `event`. Absent handlers are ignored.
    pub fn unsubscribe<Q>(&self, event: &Q, handler: &HandlerRef<P>)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        if self.registry.write().remove(event, handler) {
            debug!(event = %event, "Handler unsubscribed");
        }
    }

    /// Alias of [`unsubscribe`](Self::unsubscribe).
    pub fn off<Q>(&self, event: &Q, handler: &HandlerRef<P>)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.unsubscribe(event, handler);
    }

    /// Register `handler` to run on the next emission of `event` only.
    ///
    /// The handler detaches itself after that invocation, whether it
    /// succeeded or failed. It cannot be removed with `unsubscribe` because
    /// the bus never stores `handler` itself, only a wrapper around it; use
    /// `clear` to cancel a pending once handler.
    pub fn once(&self, event: K, handler: HandlerRef<P>) {
        let wrapper = OnceHandler::wrap(Arc::downgrade(&self.registry), event.clone(), handler);
        self.subscribe(event, wrapper);
    }

    /// Deliver `payload` to every handler registered for `event`.
    ///
    /// Never fails. Handler failures go to the diagnostic sink, one report
    /// per failed invocation.
    pub fn publish<Q>(&self, event: &Q, payload: &P)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        let handlers = self.registry.read().snapshot(event);
        if handlers.is_empty() {
            trace!(event = %event, "No subscribers");
            return;
        }
        self.stats.events_published.fetch_add(1, Ordering::Relaxed);

        let mut failures = 0usize;
        for handler in &handlers {
            if let Err(error) = handler.invoke(payload) {
                failures += 1;
                self.stats.handler_failures.fetch_add(1, Ordering::Relaxed);
                self.sink.report(&HandlerFailure {
                    event: event.to_string(),
                    error,
                });
            }
        }

        debug!(
            event = %event,
            handlers = handlers.len(),
            failures,
            "Event published"
        );
    }

    /// Alias of [`publish`](Self::publish).
    pub fn emit<Q>(&self, event: &Q, payload: &P)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.publish(event, payload);
    }

    /// Remove every handler for `event`, or for all events when `None`.
    pub fn clear(&self, event: Option<&K>) {
        match event {
            Some(event) => self.clear_event(event),
            None => self.clear_all(),
        }
    }

    /// Remove every handler registered for `event`.
    pub fn clear_event<Q>(&self, event: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        let removed = self.registry.write().remove_event(event);
        debug!(event = %event, removed, "Event cleared");
    }

    /// Reset the whole registry.
    pub fn clear_all(&self) {
        let removed = self.registry.write().clear();
        debug!(removed, "All events cleared");
    }

    /// True if at least one handler is registered for `event`.
    #[must_use]
    pub fn has_subscribers<Q>(&self, event: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.subscriber_count(event) > 0
    }

    /// Number of handlers registered for `event`.
    #[must_use]
    pub fn subscriber_count<Q>(&self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.registry.read().count(event)
    }

    /// Number of events with at least one handler.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.registry.read().event_count()
    }

    /// Total dispatch passes that reached at least one handler.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.stats.events_published.load(Ordering::Relaxed)
    }

    /// Total handler invocations that failed and were reported.
    #[must_use]
    pub fn handler_failures(&self) -> u64 {
        self.stats.handler_failures.load(Ordering::Relaxed)
    }
}

impl<K, P> Default for EventBus<K, P>
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    P: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> Clone for EventBus<K, P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            sink: Arc::clone(&self.sink),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K: Eq + Hash, P> fmt::Debug for EventBus<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.registry.read().event_count())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
