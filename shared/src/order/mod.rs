//! Order Domain Module
//!
//! Types for the order lifecycle state machine:
//! - Status enums: the order and table state machines with their legal edges
//! - Snapshots: the order aggregate and its line items (add-time price snapshots)
//! - Splits: the client-held bill-split partition and its completeness check
//! - Requests: the operation payloads clients send

pub mod request;
pub mod snapshot;
pub mod split;
pub mod types;

// Re-exports
pub use request::{OrderCreate, OrderItemAdd, OrderItemQuantityUpdate, OrderTransition};
pub use snapshot::{ModifierSnapshot, Order, OrderItem};
pub use split::{SplitGroup, SplitPlan, SplitPlanError, validate_partition};
pub use types::{OrderStatus, TableStatus};
