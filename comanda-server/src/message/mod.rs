//! Real-time event distribution
//!
//! The event types and topics live in `shared::message`; this module owns
//! the server-side delivery machinery.

pub mod bus;

pub use bus::{EventPublisher, MessageBus};
