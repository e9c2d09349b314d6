//! Order lifecycle module
//!
//! - **manager**: transactional order operations (open, items, transitions,
//!   close, splits) and post-commit event publication
//! - **money**: Decimal arithmetic for item and order totals
//! - **invoice**: the denormalized invoice snapshot builder
//!
//! # Data flow
//!
//! ```text
//! HTTP handler → OrdersManager → redb write transaction
//!                     │               (orders / active_orders /
//!                     │                dining_tables / invoices / sequences)
//!                     ▼
//!               MessageBus (post-commit)
//!                     ▼
//!        table-events / kitchen-events / waiter-events
//! ```

pub mod invoice;
pub mod manager;
pub mod money;

// Re-exports
pub use manager::{OrderError, OrderResult, OrdersManager};
