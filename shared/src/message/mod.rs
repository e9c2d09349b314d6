//! Real-time event types
//!
//! Shared between the server and display clients. Events travel over
//! named topics; the payload is JSON-encoded so the envelope stays
//! type-erased on the wire while [`PosEvent::parse_payload`] restores the
//! typed form on the consumer side.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

// ============================================================================
// Topics
// ============================================================================

/// Table occupancy changes, consumed by floor displays
pub const TOPIC_TABLE_EVENTS: &str = "table-events";
/// Kitchen tickets, consumed by kitchen displays
pub const TOPIC_KITCHEN_EVENTS: &str = "kitchen-events";
/// Ready-for-pickup alerts, consumed by waiter devices
pub const TOPIC_WAITER_EVENTS: &str = "waiter-events";

// ============================================================================
// Event Type
// ============================================================================

/// Event bus event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Table occupancy/billing change
    TableChanged,
    /// First kitchen routing of an order
    TicketNew,
    /// Re-send after the COOKING → OPEN pull-back
    TicketResend,
    /// Order ready for pickup
    OrderReady,
    /// Invoice issued at close
    InvoiceIssued,
}

impl EventType {
    /// The topic this event type is published on.
    pub fn topic(&self) -> &'static str {
        match self {
            EventType::TableChanged => TOPIC_TABLE_EVENTS,
            EventType::TicketNew | EventType::TicketResend => TOPIC_KITCHEN_EVENTS,
            EventType::OrderReady => TOPIC_WAITER_EVENTS,
            EventType::InvoiceIssued => TOPIC_TABLE_EVENTS,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::TableChanged => write!(f, "table_changed"),
            EventType::TicketNew => write!(f, "ticket_new"),
            EventType::TicketResend => write!(f, "ticket_resend"),
            EventType::OrderReady => write!(f, "order_ready"),
            EventType::InvoiceIssued => write!(f, "invoice_issued"),
        }
    }
}

// ============================================================================
// Event Envelope
// ============================================================================

/// Event bus envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    /// Emission timestamp (epoch millis)
    pub emitted_at: i64,
    pub payload: Vec<u8>,
}

impl PosEvent {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            emitted_at: chrono::Utc::now().timestamp_millis(),
            payload,
        }
    }

    /// The topic this event belongs on.
    pub fn topic(&self) -> &'static str {
        self.event_type.topic()
    }

    /// Table occupancy change event
    pub fn table_changed(payload: &TableChangedPayload) -> Self {
        Self::new(
            EventType::TableChanged,
            serde_json::to_vec(payload).expect("Failed to serialize table change payload"),
        )
    }

    /// Kitchen ticket event (first routing)
    pub fn ticket_new(payload: &KitchenTicketPayload) -> Self {
        Self::new(
            EventType::TicketNew,
            serde_json::to_vec(payload).expect("Failed to serialize kitchen ticket payload"),
        )
    }

    /// Kitchen ticket re-send event (after a pull-back edit)
    pub fn ticket_resend(payload: &KitchenTicketPayload) -> Self {
        Self::new(
            EventType::TicketResend,
            serde_json::to_vec(payload).expect("Failed to serialize kitchen ticket payload"),
        )
    }

    /// Ready-for-pickup alert
    pub fn order_ready(payload: &ReadyAlertPayload) -> Self {
        Self::new(
            EventType::OrderReady,
            serde_json::to_vec(payload).expect("Failed to serialize ready alert payload"),
        )
    }

    /// Invoice issued event
    pub fn invoice_issued(payload: &InvoiceIssuedPayload) -> Self {
        Self::new(
            EventType::InvoiceIssued,
            serde_json::to_vec(payload).expect("Failed to serialize invoice payload"),
        )
    }

    /// Parse the payload into its typed form.
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::TableStatus;

    #[test]
    fn test_event_topic_mapping() {
        let event = PosEvent::table_changed(&TableChangedPayload {
            table_id: 5,
            status: TableStatus::Occupied,
        });
        assert_eq!(event.topic(), TOPIC_TABLE_EVENTS);
        assert_eq!(EventType::TicketResend.topic(), TOPIC_KITCHEN_EVENTS);
        assert_eq!(EventType::OrderReady.topic(), TOPIC_WAITER_EVENTS);
    }

    #[test]
    fn test_payload_round_trip() {
        let event = PosEvent::order_ready(&ReadyAlertPayload {
            table_id: 3,
            table_name: "Table 3".to_string(),
        });

        let parsed: ReadyAlertPayload = event.parse_payload().unwrap();
        assert_eq!(parsed.table_id, 3);
        assert_eq!(parsed.table_name, "Table 3");
    }

    #[test]
    fn test_wrong_payload_type_fails() {
        let event = PosEvent::table_changed(&TableChangedPayload {
            table_id: 1,
            status: TableStatus::Available,
        });
        assert!(event.parse_payload::<ReadyAlertPayload>().is_err());
    }
}
