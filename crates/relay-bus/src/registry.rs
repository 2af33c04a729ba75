//! Handler registry: event identifier -> ordered, duplicate-free handlers.

use crate::handler::HandlerRef;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Plain registry state. Locking is the owner's job.
pub(crate) struct Registry<K, P> {
    handlers: HashMap<K, Vec<HandlerRef<P>>>,
}

impl<K: Eq + Hash, P> Registry<K, P> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Append `handler` under `event`. Returns false if it was already there.
    pub(crate) fn insert(&mut self, event: K, handler: HandlerRef<P>) -> bool {
        let handlers = self.handlers.entry(event).or_default();
        if handlers.iter().any(|h| h.same_handler(&handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Remove `handler` from `event`. Empty sequences are dropped with their key.
    pub(crate) fn remove<Q>(&mut self, event: &Q, handler: &HandlerRef<P>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(handlers) = self.handlers.get_mut(event) else {
            return false;
        };

        let before = handlers.len();
        handlers.retain(|h| !h.same_handler(handler));
        let removed = handlers.len() != before;

        if handlers.is_empty() {
            self.handlers.remove(event);
        }
        removed
    }

    /// Drop every handler for `event`, returning how many were removed.
    pub(crate) fn remove_event<Q>(&mut self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handlers.remove(event).map_or(0, |handlers| handlers.len())
    }

    /// Drop everything, returning how many handlers were removed.
    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.handlers.values().map(Vec::len).sum();
        self.handlers.clear();
        removed
    }

    /// Copy of the sequence for `event` as it is right now.
    pub(crate) fn snapshot<Q>(&self, event: &Q) -> Vec<HandlerRef<P>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handlers.get(event).cloned().unwrap_or_default()
    }

    pub(crate) fn count<Q>(&self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handlers.get(event).map_or(0, Vec::len)
    }

    pub(crate) fn event_count(&self) -> usize {
        self.handlers.len()
    }
}
