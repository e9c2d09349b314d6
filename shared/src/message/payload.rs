use serde::{Deserialize, Serialize};

use crate::order::{Order, TableStatus};

// ==================== Table Events ====================

/// Table occupancy change (table-events topic)
///
/// Consumers apply this idempotently: the payload carries the new status,
/// not a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableChangedPayload {
    pub table_id: u64,
    pub status: TableStatus,
}

// ==================== Kitchen Events ====================

/// Kitchen ticket (kitchen-events topic)
///
/// Carries the complete order (table, items, product names, notes) so a
/// kitchen display renders without a follow-up fetch. A re-send after the
/// pull-back edit carries the full updated list, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenTicketPayload {
    pub order: Order,
}

// ==================== Waiter Events ====================

/// Ready-for-pickup alert (waiter-events topic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyAlertPayload {
    pub table_id: u64,
    pub table_name: String,
}

// ==================== Invoice Events ====================

/// Invoice issued at close (table-events topic, floor displays show the
/// final amount next to the freed table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceIssuedPayload {
    pub order_id: String,
    pub invoice_number: String,
    pub grand_total: f64,
}
