//! Dining Table Model

use serde::{Deserialize, Serialize};

use crate::order::TableStatus;

/// Dining table entity
///
/// `status` is owned by the order lifecycle: order creation claims the
/// table, close/cancel frees it. The only staff-writable flip is the
/// OCCUPIED ↔ BILLING pair (the "please bring the check" signal).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: u64,
    /// Owning restaurant account
    pub owner_id: u64,
    pub name: String,
    pub status: TableStatus,
    pub created_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub name: String,
}

/// Update dining table payload (rename only; status has its own endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub name: Option<String>,
}

/// Staff status request payload (BILLING signal and its undo)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusRequest {
    pub status: TableStatus,
}
