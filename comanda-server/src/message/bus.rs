//! In-process event bus
//!
//! # Architecture
//!
//! ```text
//! OrdersManager ──▶ publish(topic, event)
//!                        │
//!          ┌─────────────┼─────────────┐
//!          ▼             ▼             ▼
//!   table-events   kitchen-events  waiter-events
//!   (broadcast)     (broadcast)     (broadcast)
//!          │             │             │
//!          ▼             ▼             ▼
//!    floor displays  kitchen KDS   waiter devices
//! ```
//!
//! One `tokio::sync::broadcast` channel per topic, created lazily on first
//! use. Publication is fire-and-forget: the mutating request has already
//! committed by the time an event goes out, so delivery problems are
//! logged and swallowed. Consumers treat events as at-least-once hints and
//! re-fetch state idempotently; a lagging subscriber drops old events
//! (broadcast ring-buffer semantics) rather than slowing the kitchen down.

use std::sync::Arc;

use dashmap::DashMap;
use shared::message::PosEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Capacity of each per-topic broadcast channel
const TOPIC_CHANNEL_CAPACITY: usize = 1024;

/// Publishing seam between order mutations and event delivery
///
/// The orders manager and the table handlers publish through this trait,
/// so tests can capture events and a future networked transport can
/// replace the in-process bus without touching the mutation path.
pub trait EventPublisher: Send + Sync {
    /// Publish an event on a topic. Infallible by contract: failures are
    /// the implementation's to log, never the mutating request's to see.
    fn publish(&self, topic: &str, event: PosEvent);
}

/// In-process event bus with one broadcast channel per topic
#[derive(Debug, Clone)]
pub struct MessageBus {
    /// Topic name -> broadcast sender
    channels: Arc<DashMap<String, broadcast::Sender<PosEvent>>>,
    capacity: usize,
    /// Shutdown signal for subscriber tasks
    shutdown_token: CancellationToken,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::with_capacity(TOPIC_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            capacity,
            shutdown_token: CancellationToken::new(),
        }
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<PosEvent> {
        self.channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Subscribe to a topic (display clients, tests)
    ///
    /// The receiver only sees events published after this call.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<PosEvent> {
        self.sender(topic).subscribe()
    }

    /// Current subscriber count on a topic
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.channels
            .get(topic)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Token observed by long-lived subscriber tasks
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Signal all subscriber tasks to stop
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

impl EventPublisher for MessageBus {
    fn publish(&self, topic: &str, event: PosEvent) {
        let event_type = event.event_type;
        match self.sender(topic).send(event) {
            Ok(receivers) => {
                tracing::debug!(topic, event = %event_type, receivers, "Event published");
            }
            Err(_) => {
                // send only fails when nobody is subscribed; events are
                // post-commit notifications, so an empty topic is routine
                tracing::debug!(topic, event = %event_type, "Event dropped, no subscribers");
            }
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{TOPIC_TABLE_EVENTS, TOPIC_WAITER_EVENTS, TableChangedPayload};
    use shared::order::TableStatus;

    fn table_event(table_id: u64) -> PosEvent {
        PosEvent::table_changed(&TableChangedPayload {
            table_id,
            status: TableStatus::Occupied,
        })
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = MessageBus::new();
        let mut rx = bus.subscribe(TOPIC_TABLE_EVENTS);

        bus.publish(TOPIC_TABLE_EVENTS, table_event(7));

        let event = rx.recv().await.unwrap();
        let payload: TableChangedPayload = event.parse_payload().unwrap();
        assert_eq!(payload.table_id, 7);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let bus = MessageBus::new();
        // Must not panic or error
        bus.publish(TOPIC_TABLE_EVENTS, table_event(1));
        assert_eq!(bus.subscriber_count(TOPIC_TABLE_EVENTS), 0);
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let bus = MessageBus::new();
        let mut table_rx = bus.subscribe(TOPIC_TABLE_EVENTS);
        let mut waiter_rx = bus.subscribe(TOPIC_WAITER_EVENTS);

        bus.publish(TOPIC_TABLE_EVENTS, table_event(3));

        assert!(table_rx.recv().await.is_ok());
        assert!(waiter_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_fan_out() {
        let bus = MessageBus::new();
        let mut rx1 = bus.subscribe(TOPIC_TABLE_EVENTS);
        let mut rx2 = bus.subscribe(TOPIC_TABLE_EVENTS);
        assert_eq!(bus.subscriber_count(TOPIC_TABLE_EVENTS), 2);

        bus.publish(TOPIC_TABLE_EVENTS, table_event(9));

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }
}
