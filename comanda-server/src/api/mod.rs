//! API route modules
//!
//! One module per resource, each exposing a `router()` assembled in
//! [`crate::core::server::build_app`]. Permission layers are applied per
//! route group inside each module; authentication itself is a global
//! layer on the app.
//!
//! # Modules
//!
//! - [`health`] - liveness and component checks (public)
//! - [`auth`] - login and the current-account profile
//! - [`categories`] - menu category management
//! - [`products`] - products plus their modifier groups and options
//! - [`tables`] - dining tables and the billing-signal endpoint
//! - [`orders`] - the order lifecycle surface
//! - [`invoices`] - issued invoice lookup (read-only reprint)
//! - [`settings`] - restaurant settings (owner only)

pub mod auth;
pub mod health;

// Catalog
pub mod categories;
pub mod products;

// Floor and service
pub mod invoices;
pub mod orders;
pub mod tables;

// Configuration
pub mod settings;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
