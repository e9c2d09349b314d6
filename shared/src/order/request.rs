//! Order operation request payloads
//!
//! The bodies clients POST/PUT against the order endpoints. The server
//! never trusts prices or totals from these: `OrderItemAdd` carries only
//! catalog ids, and the authoritative price is read fresh inside the
//! mutating transaction.

use serde::{Deserialize, Serialize};

use super::types::OrderStatus;

/// Open an order on a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: u64,
}

/// Add one line to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemAdd {
    pub product_id: u64,
    pub quantity: i32,
    /// Chosen modifier option ids, resolved and snapshotted server-side
    #[serde(default)]
    pub option_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Change a line's quantity (zero or below removes the line)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemQuantityUpdate {
    pub quantity: i32,
}

/// Request a status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTransition {
    pub status: OrderStatus,
}
