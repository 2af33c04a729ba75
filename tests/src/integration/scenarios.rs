//! # End-to-End Scenarios
//!
//! Drives the bus the way an application would:
//!
//! ```text
//! [Signup service] ──UserSignedUp──→ [DomainBus]
//!                                        │
//!                 ┌──────────────────────┼──────────────────────┐
//!                 ↓                      ↓                      ↓
//!          [Welcome mailer]     [Audit (fails)]       [First-order bonus]
//!                 │                                     (once handler)
//!                 ↓
//!           OrderPlaced ──→ [DomainBus] ──→ [Order ledger]
//! ```

// =============================================================================
// TEST FIXTURES (only compiled during tests)
// =============================================================================

#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use parking_lot::RwLock;

#[cfg(test)]
use relay_bus::{
    DomainBus, DomainEvent, EventBus, EventType, HandlerError, HandlerRef, MemorySink, Order,
    User,
};

#[cfg(test)]
use uuid::Uuid;

/// Wires a domain bus with the handlers of a small signup/order flow.
#[cfg(test)]
struct SignupFlowHarness {
    bus: DomainBus,
    sink: Arc<MemorySink>,
    welcomed: Arc<RwLock<Vec<String>>>,
    ledger: Arc<RwLock<Vec<String>>>,
    bonuses: Arc<RwLock<Vec<String>>>,
}

#[cfg(test)]
impl SignupFlowHarness {
    fn new() -> Self {
        let sink = Arc::new(MemorySink::new());
        let bus = DomainBus::with_sink(sink.clone());
        let harness = Self {
            bus,
            sink,
            welcomed: Arc::new(RwLock::new(Vec::new())),
            ledger: Arc::new(RwLock::new(Vec::new())),
            bonuses: Arc::new(RwLock::new(Vec::new())),
        };
        harness.wire();
        harness
    }

    fn wire(&self) {
        // Welcome mailer: records the user and places a welcome order.
        let welcomed = self.welcomed.clone();
        let bus = self.bus.clone();
        self.bus.subscribe(
            EventType::UserSignedUp,
            HandlerRef::new(move |event: &DomainEvent| {
                let user = event
                    .as_user()
                    .ok_or_else(|| HandlerError::msg("expected a user payload"))?;
                welcomed.write().push(user.email.clone());
                bus.publish_event(&welcome_order(user).into());
                Ok(())
            }),
        );

        // Audit trail that is always down.
        self.bus.subscribe(
            EventType::UserSignedUp,
            HandlerRef::new(|_: &DomainEvent| Err(HandlerError::msg("audit store unavailable"))),
        );

        // Order ledger.
        let ledger = self.ledger.clone();
        self.bus.subscribe(
            EventType::OrderPlaced,
            HandlerRef::infallible(move |event: &DomainEvent| {
                if let Some(order) = event.as_order() {
                    ledger.write().push(order.order_id.clone());
                }
            }),
        );

        // Bonus for the very first order only.
        let bonuses = self.bonuses.clone();
        self.bus.once(
            EventType::OrderPlaced,
            HandlerRef::infallible(move |event: &DomainEvent| {
                if let Some(order) = event.as_order() {
                    bonuses.write().push(order.order_id.clone());
                }
            }),
        );
    }
}

#[cfg(test)]
fn welcome_order(user: &User) -> Order {
    Order {
        order_id: format!("welcome-{}", user.email),
        user_id: user.id,
        total_cents: 0,
    }
}

#[cfg(test)]
fn order(id: &str) -> Order {
    Order {
        order_id: id.to_string(),
        user_id: Uuid::nil(),
        total_cents: 1_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_bus::EventEmitter;
    use relay_telemetry::{init_logging, TelemetryConfig};

    #[test]
    fn test_order_placed_reaches_both_handlers_in_order() {
        let bus: EventBus<&'static str, Order> = EventBus::new();
        let calls = Arc::new(RwLock::new(Vec::new()));

        for tag in ["h1", "h2"] {
            let calls = calls.clone();
            bus.subscribe(
                "orderPlaced",
                HandlerRef::infallible(move |o: &Order| {
                    calls.write().push((tag, o.order_id.clone()));
                }),
            );
        }

        bus.publish("orderPlaced", &order("1"));

        assert_eq!(
            *calls.read(),
            vec![("h1", "1".to_string()), ("h2", "1".to_string())]
        );
    }

    #[test]
    fn test_once_sees_first_payload_only() {
        let bus: EventBus<&'static str, Order> = EventBus::new();
        let seen = Arc::new(RwLock::new(Vec::new()));
        let log = seen.clone();
        bus.once(
            "x",
            HandlerRef::infallible(move |o: &Order| log.write().push(o.order_id.clone())),
        );

        bus.publish("x", &order("p1"));
        bus.publish("x", &order("p2"));

        assert_eq!(*seen.read(), vec!["p1"]);
    }

    #[test]
    fn test_throwing_handler_reported_once_and_next_still_runs() {
        let sink = Arc::new(MemorySink::new());
        let bus: EventBus<&'static str, Order> = EventBus::with_sink(sink.clone());
        let reached = Arc::new(RwLock::new(false));
        let flag = reached.clone();

        bus.subscribe("y", HandlerRef::new(|_: &Order| Err("Handler error".into())));
        bus.subscribe("y", HandlerRef::infallible(move |_: &Order| *flag.write() = true));

        bus.publish("y", &order("1"));

        assert!(*reached.read());
        let failures = sink.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].event, "y");
        assert_eq!(
            failures[0].to_string(),
            "Error occurred while handling event 'y': Handler error"
        );
    }

    #[test]
    fn test_signup_flow() {
        let harness = SignupFlowHarness::new();
        let ada = User::new("ada@example.com", "Ada");
        let bo = User::new("bo@example.com", "Bo");

        harness.bus.publish_event(&ada.clone().into());
        harness.bus.publish_event(&bo.into());
        harness.bus.publish_event(&order("manual-1").into());

        assert_eq!(
            *harness.welcomed.read(),
            vec!["ada@example.com", "bo@example.com"]
        );
        assert_eq!(
            *harness.ledger.read(),
            vec![
                "welcome-ada@example.com",
                "welcome-bo@example.com",
                "manual-1"
            ]
        );
        // Only the first order ever placed earns the bonus.
        assert_eq!(*harness.bonuses.read(), vec!["welcome-ada@example.com"]);

        // One audit failure per signup, tagged with the event name.
        let failures = harness.sink.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|f| f.event == "userSignedUp"));
        assert_eq!(harness.bus.handler_failures(), 2);
        assert_eq!(harness.bus.events_published(), 5);
    }

    #[test]
    fn test_clear_one_event_keeps_the_other() {
        let harness = SignupFlowHarness::new();

        harness.bus.clear(Some(&EventType::UserSignedUp));
        harness
            .bus
            .publish_event(&User::new("c@example.com", "Cy").into());
        harness.bus.publish_event(&order("o-1").into());

        assert!(harness.welcomed.read().is_empty());
        assert_eq!(*harness.ledger.read(), vec!["o-1"]);
        assert!(harness.sink.is_empty());

        harness.bus.clear(None);
        assert!(!harness.bus.has_subscribers(&EventType::OrderPlaced));
    }

    #[test]
    fn test_default_sink_logs_through_telemetry() {
        let config = TelemetryConfig {
            log_level: "relay_bus=debug".to_string(),
            console_output: false,
            ..TelemetryConfig::default()
        };
        let _guard = init_logging(&config).expect("logging");

        let bus: EventBus<String, u32> = EventBus::new();
        bus.subscribe(
            "tick".to_string(),
            HandlerRef::new(|n: &u32| Err(HandlerError::msg(format!("bad tick {n}")))),
        );
        bus.publish("tick", &7);

        assert_eq!(bus.handler_failures(), 1);
    }

    #[test]
    fn test_emitter_alongside_bus() {
        let emitter: EventEmitter<Order, u64> = EventEmitter::new();
        let totals = emitter.subscribe("orderPlaced", |o: &Order| o.total_cents);
        emitter.subscribe("orderPlaced", |o: &Order| o.total_cents * 2);

        assert_eq!(emitter.emit("orderPlaced", &order("1")), vec![1_000, 2_000]);

        totals.unsubscribe();
        assert_eq!(emitter.emit("orderPlaced", &order("2")), vec![2_000]);
    }
}
