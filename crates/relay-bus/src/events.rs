//! # Domain Events
//!
//! Static event-to-payload mapping for the application's own events.
//! The bus itself is payload-agnostic; this module pins each
//! [`EventType`] to exactly one payload shape via [`DomainEvent`].

use crate::bus::EventBus;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifiers of all domain events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    UserSignedUp,
    OrderPlaced,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [EventType; 2] = [EventType::UserSignedUp, EventType::OrderPlaced];

    /// Wire name of the event.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserSignedUp => "userSignedUp",
            Self::OrderPlaced => "orderPlaced",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================================
// PAYLOADS
// =========================================================================

/// Payload of [`EventType::UserSignedUp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl User {
    /// New user with a random id.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Payload of [`EventType::OrderPlaced`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub user_id: Uuid,
    /// Order total in the smallest currency unit.
    pub total_cents: u64,
}

// =========================================================================
// EVENTS
// =========================================================================

/// A domain event together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum DomainEvent {
    UserSignedUp(User),
    OrderPlaced(Order),
}

impl DomainEvent {
    /// The identifier this event is published under.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            Self::UserSignedUp(_) => EventType::UserSignedUp,
            Self::OrderPlaced(_) => EventType::OrderPlaced,
        }
    }

    #[must_use]
    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::UserSignedUp(user) => Some(user),
            Self::OrderPlaced(_) => None,
        }
    }

    #[must_use]
    pub fn as_order(&self) -> Option<&Order> {
        match self {
            Self::OrderPlaced(order) => Some(order),
            Self::UserSignedUp(_) => None,
        }
    }
}

impl From<User> for DomainEvent {
    fn from(user: User) -> Self {
        Self::UserSignedUp(user)
    }
}

impl From<Order> for DomainEvent {
    fn from(order: Order) -> Self {
        Self::OrderPlaced(order)
    }
}

/// Bus carrying domain events keyed by their [`EventType`].
pub type DomainBus = EventBus<EventType, DomainEvent>;

impl EventBus<EventType, DomainEvent> {
    /// Publish `event` under its own [`EventType`].
    ///
    /// Keying by `event.event_type()` means a payload can never be
    /// delivered under the wrong identifier.
    pub fn publish_event(&self, event: &DomainEvent) {
        self.publish(&event.event_type(), event);
    }
}
