//! One-shot handler wrapper.
//!
//! `EventBus::once` never registers the caller's handler directly. It
//! registers a [`OnceHandler`], whose own identity is what gets removed
//! after the first invocation.

use crate::error::HandlerError;
use crate::handler::{EventHandler, HandlerRef};
use crate::registry::Registry;
use parking_lot::RwLock;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

pub(crate) struct OnceHandler<K, P> {
    /// Weak so a pending once handler does not keep the registry alive.
    registry: Weak<RwLock<Registry<K, P>>>,
    event: K,
    inner: HandlerRef<P>,
    this: Weak<OnceHandler<K, P>>,
    fired: AtomicBool,
}

impl<K, P> OnceHandler<K, P>
where
    K: Eq + Hash + Send + Sync + 'static,
    P: 'static,
{
    /// Build the wrapper and return it as a registrable handler.
    pub(crate) fn wrap(
        registry: Weak<RwLock<Registry<K, P>>>,
        event: K,
        inner: HandlerRef<P>,
    ) -> HandlerRef<P> {
        let wrapper = Arc::new_cyclic(|this| Self {
            registry,
            event,
            inner,
            this: this.clone(),
            fired: AtomicBool::new(false),
        });
        HandlerRef::from_arc(wrapper)
    }

    fn detach(&self) {
        let (Some(registry), Some(this)) = (self.registry.upgrade(), self.this.upgrade()) else {
            return;
        };
        let this: Arc<dyn EventHandler<P>> = this;
        let removed = registry.write().remove(&self.event, &HandlerRef::from_arc(this));
        trace!(removed, "Once handler detached");
    }
}

impl<K, P> EventHandler<P> for OnceHandler<K, P>
where
    K: Eq + Hash + Send + Sync + 'static,
    P: 'static,
{
    fn handle(&self, payload: &P) -> Result<(), HandlerError> {
        // Two concurrent passes may both have this wrapper in their snapshot.
        if self.fired.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let result = self.inner.invoke(payload);
        self.detach();
        result
    }
}
