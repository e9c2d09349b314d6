//! Core module - configuration, state and server lifecycle
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared service references
//! - [`Server`] - HTTP server
//! - [`ServerError`] - boot/run errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{Server, build_app};
pub use state::ServerState;
