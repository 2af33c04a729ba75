//! # Relay Bus - In-Process Publish/Subscribe
//!
//! A typed registry mapping event identifiers to ordered handler lists,
//! with synchronous dispatch, one-shot subscriptions and per-handler
//! failure isolation.
//!
//! ```text
//! ┌──────────────┐   publish(event, &payload)   ┌──────────────┐
//! │   Producer   │ ───────────────────────────► │   EventBus   │
//! └──────────────┘                              │  (registry)  │
//!                                               └──────┬───────┘
//!                                  snapshot, in order  │
//!                         ┌────────────────┬───────────┴─────┐
//!                         ▼                ▼                 ▼
//!                      handler 1        handler 2 ✗       handler 3
//!                                           │
//!                                           ▼
//!                                    DiagnosticSink
//! ```
//!
//! ## Guarantees
//!
//! - Handlers run in registration order, each at most once per event.
//! - `once` handlers fire on the next emission only.
//! - A failing (erroring or panicking) handler is reported and skipped;
//!   it never reaches the caller of `publish`.
//! - Nothing is asynchronous: `publish` returns after every handler ran.
//!
//! ## Example
//!
//! ```
//! use relay_bus::{EventBus, HandlerRef};
//!
//! let bus: EventBus<&'static str, String> = EventBus::new();
//! let greet = HandlerRef::infallible(|name: &String| println!("hello {name}"));
//!
//! bus.subscribe("greet", greet.clone());
//! bus.publish("greet", &"world".to_string());
//! bus.unsubscribe("greet", &greet);
//! assert!(!bus.has_subscribers("greet"));
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod events;
pub mod handler;
mod once;
mod registry;

// Re-export main types
pub use bus::EventBus;
pub use diagnostics::{DiagnosticSink, HandlerFailure, MemorySink, TracingSink};
pub use emitter::{Callback, EventEmitter, Subscription};
pub use error::HandlerError;
pub use events::{DomainBus, DomainEvent, EventType, Order, User};
pub use handler::{EventHandler, HandlerRef};
