//! Order aggregate and line-item snapshots
//!
//! Items snapshot the product's base price and the chosen modifier options
//! at add time. They never reference catalog rows afterwards, so later
//! catalog edits cannot corrupt open or archived orders. The order's
//! `total` is derived state: the server recomputes it from the full item
//! list inside every mutating transaction and clients must never send it
//! back as input.

use serde::{Deserialize, Serialize};

use super::types::OrderStatus;

/// Chosen modifier option, frozen at add time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierSnapshot {
    /// Modifier option ID at snapshot time (not a live reference)
    pub option_id: u64,
    /// Option name, as printed on tickets and invoices
    pub name: String,
    /// Price delta per unit
    pub price: f64,
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Line ID (server-assigned UUID)
    pub id: String,
    /// Product ID at snapshot time
    pub product_id: u64,
    /// Product name, frozen for display and invoicing
    pub product_name: String,
    /// Base price snapshot (per unit, before modifiers)
    pub price: f64,
    /// Quantity, always > 0 (quantity 0 deletes the line instead)
    pub quantity: i32,
    /// Modifier snapshots chosen at add time
    #[serde(default)]
    pub selected_modifiers: Vec<ModifierSnapshot>,
    /// Free-text kitchen notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp (epoch millis)
    pub created_at: i64,
}

/// Order aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (server-assigned UUID)
    pub id: String,
    /// Claimed table
    pub table_id: u64,
    /// Table name, frozen for tickets and invoices
    pub table_name: String,
    /// Creating staff member
    pub staff_id: u64,
    /// Staff display name, frozen for the invoice's sale info
    pub staff_name: String,
    /// Owning restaurant account (tenant partition key)
    pub owner_id: u64,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Line items
    pub items: Vec<OrderItem>,
    /// Derived running total, recomputed on every item mutation
    pub total: f64,
    /// First time the order was routed to the kitchen; present means a
    /// later COOKING transition is a re-send, not a new ticket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_to_kitchen_at: Option<i64>,
    /// Creation timestamp (epoch millis)
    pub created_at: i64,
    /// Last mutation timestamp
    pub updated_at: i64,
    /// Set when the order reaches CLOSED or CANCELED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
}

impl Order {
    pub fn find_item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}
