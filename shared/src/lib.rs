//! Shared types for the Comanda POS core
//!
//! Common types used by the server and its display clients: order and
//! table state machines, catalog models, invoice documents, and the
//! real-time event envelope.

pub mod message;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Event bus re-exports (for convenient access)
pub use message::{EventType, PosEvent};

// State machine re-exports
pub use order::{OrderStatus, TableStatus};
