//! # Event Emitter
//!
//! Name-keyed emitter where every `subscribe` hands back a [`Subscription`]
//! used to detach that one callback later.
//!
//! Differences from [`EventBus`](crate::EventBus):
//!
//! - callbacks are not deduplicated; subscribing twice means two calls,
//! - `emit` collects and returns every callback's result,
//! - failures are not isolated: a panicking callback unwinds into `emit`.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Callback invoked with the emitted arguments.
pub type Callback<A, R> = Arc<dyn Fn(&A) -> R + Send + Sync>;

struct Listener<A, R> {
    id: u64,
    callback: Callback<A, R>,
}

impl<A, R> Clone for Listener<A, R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

type Listeners<A, R> = HashMap<String, Vec<Listener<A, R>>>;

/// Emitter of named events carrying `A`, collecting callback results `R`.
pub struct EventEmitter<A, R> {
    listeners: Arc<RwLock<Listeners<A, R>>>,
    next_id: AtomicU64,
}

impl<A: 'static, R: 'static> EventEmitter<A, R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `callback` under `name`.
    pub fn subscribe<F>(&self, name: impl Into<String>, callback: F) -> Subscription<A, R>
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        let name = name.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.listeners
            .write()
            .entry(name.clone())
            .or_default()
            .push(Listener {
                id,
                callback: Arc::new(callback),
            });
        debug!(event = %name, id, "Listener subscribed");

        Subscription {
            listeners: Arc::downgrade(&self.listeners),
            name,
            id,
        }
    }

    /// Call every listener of `name` in subscription order and collect results.
    ///
    /// Unknown names yield an empty vector.
    pub fn emit(&self, name: &str, args: &A) -> Vec<R> {
        let listeners = match self.listeners.read().get(name) {
            Some(listeners) => listeners.clone(),
            None => return Vec::new(),
        };
        listeners.iter().map(|l| (l.callback)(args)).collect()
    }

    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.read().get(name).map_or(0, Vec::len)
    }
}

impl<A: 'static, R: 'static> Default for EventEmitter<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> fmt::Debug for EventEmitter<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("events", &self.listeners.read().len())
            .finish_non_exhaustive()
    }
}

/// Handle for one registered callback.
///
/// Dropping it leaves the callback registered.
pub struct Subscription<A, R> {
    listeners: Weak<RwLock<Listeners<A, R>>>,
    name: String,
    id: u64,
}

impl<A, R> Subscription<A, R> {
    /// Event name this subscription listens to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detach the callback. No-op if the emitter is gone.
    pub fn unsubscribe(self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut listeners = listeners.write();
        let Some(entries) = listeners.get_mut(&self.name) else {
            return;
        };

        entries.retain(|l| l.id != self.id);
        if entries.is_empty() {
            listeners.remove(&self.name);
        }
        debug!(event = %self.name, id = self.id, "Listener unsubscribed");
    }
}

impl<A, R> fmt::Debug for Subscription<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}
