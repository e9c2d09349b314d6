//! Order and table state machines
//!
//! Both lifecycles are strict graphs. Every transition goes through
//! [`OrderStatus::can_transition_to`] / [`TableStatus::can_request`] so the
//! legal edges live in exactly one place and the server and display clients
//! agree on them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Order Status
// ============================================================================

/// Order lifecycle status
///
/// ```text
/// OPEN → COOKING → READY → DELIVERED → CLOSED
///          ↓ ↑______________|
///          OPEN (pull-back: "add more / modify")
/// any non-terminal → CANCELED
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Editable, accepting items
    #[default]
    Open,
    /// Sent to the kitchen
    Cooking,
    /// Ready for pickup, waiter notified
    Ready,
    /// Served to the table
    Delivered,
    /// Invoiced and archived (terminal)
    Closed,
    /// Abandoned, retained for audit (terminal)
    Canceled,
}

impl OrderStatus {
    /// Terminal states accept no further mutation of any kind.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Closed | OrderStatus::Canceled)
    }

    /// States from which the regular (non-shortcut) close is legal.
    pub fn is_billable(&self) -> bool {
        matches!(self, OrderStatus::Ready | OrderStatus::Delivered)
    }

    /// Whether the edge `self → next` exists in the lifecycle graph.
    ///
    /// The one backward edge is COOKING → OPEN: a kitchen-routed order can
    /// be pulled back for edits without losing already-sent items.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (*self, next) {
            (Open, Cooking) => true,
            (Cooking, Ready) => true,
            (Cooking, Open) => true,
            (Ready, Delivered) => true,
            (from, Closed) => from.is_billable(),
            (from, Canceled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Open => write!(f, "OPEN"),
            OrderStatus::Cooking => write!(f, "COOKING"),
            OrderStatus::Ready => write!(f, "READY"),
            OrderStatus::Delivered => write!(f, "DELIVERED"),
            OrderStatus::Closed => write!(f, "CLOSED"),
            OrderStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

// ============================================================================
// Table Status
// ============================================================================

/// Dining table occupancy status
///
/// OCCUPIED and BILLING both imply exactly one active order on the table.
/// BILLING is a staff-initiated "please bring the check" signal, not an
/// order-status side effect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Billing,
}

impl TableStatus {
    /// Whether staff may flip the table to `next` through the status
    /// endpoint. Only the OCCUPIED ↔ BILLING pair is reachable that way;
    /// AVAILABLE is entered and left exclusively by order lifecycle
    /// operations, which keeps the occupancy invariant server-owned.
    pub fn can_request(&self, next: TableStatus) -> bool {
        matches!(
            (*self, next),
            (TableStatus::Occupied, TableStatus::Billing)
                | (TableStatus::Billing, TableStatus::Occupied)
        )
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStatus::Available => write!(f, "AVAILABLE"),
            TableStatus::Occupied => write!(f, "OCCUPIED"),
            TableStatus::Billing => write!(f, "BILLING"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_edges() {
        assert!(OrderStatus::Open.can_transition_to(OrderStatus::Cooking));
        assert!(OrderStatus::Cooking.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Closed));
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Closed));
    }

    #[test]
    fn test_pull_back_edge() {
        assert!(OrderStatus::Cooking.can_transition_to(OrderStatus::Open));
        // Only COOKING can be pulled back
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Open));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Open));
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        assert!(OrderStatus::Open.can_transition_to(OrderStatus::Canceled));
        assert!(OrderStatus::Cooking.can_transition_to(OrderStatus::Canceled));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Canceled));
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Canceled));
        assert!(!OrderStatus::Closed.can_transition_to(OrderStatus::Canceled));
        assert!(!OrderStatus::Canceled.can_transition_to(OrderStatus::Canceled));
    }

    #[test]
    fn test_illegal_edges_rejected() {
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Cooking));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cooking));
        assert!(!OrderStatus::Open.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Open.can_transition_to(OrderStatus::Closed));
        assert!(!OrderStatus::Cooking.can_transition_to(OrderStatus::Closed));
        assert!(!OrderStatus::Closed.can_transition_to(OrderStatus::Open));
        assert!(!OrderStatus::Canceled.can_transition_to(OrderStatus::Open));
    }

    #[test]
    fn test_terminal_predicates() {
        assert!(OrderStatus::Closed.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(!OrderStatus::Open.is_terminal());
        assert!(OrderStatus::Ready.is_billable());
        assert!(OrderStatus::Delivered.is_billable());
        assert!(!OrderStatus::Cooking.is_billable());
    }

    #[test]
    fn test_table_status_requests() {
        assert!(TableStatus::Occupied.can_request(TableStatus::Billing));
        assert!(TableStatus::Billing.can_request(TableStatus::Occupied));
        // AVAILABLE is owned by the order lifecycle
        assert!(!TableStatus::Available.can_request(TableStatus::Occupied));
        assert!(!TableStatus::Available.can_request(TableStatus::Billing));
        assert!(!TableStatus::Occupied.can_request(TableStatus::Available));
        assert!(!TableStatus::Billing.can_request(TableStatus::Available));
    }

    #[test]
    fn test_serde_representation() {
        let json = serde_json::to_string(&OrderStatus::Cooking).unwrap();
        assert_eq!(json, "\"COOKING\"");
        let status: TableStatus = serde_json::from_str("\"BILLING\"").unwrap();
        assert_eq!(status, TableStatus::Billing);
    }
}
