//! Comanda Server - restaurant order and billing core
//!
//! # Overview
//!
//! Single-node POS backend for a small restaurant:
//!
//! - **Orders** (`orders`): the order lifecycle state machine, money
//!   arithmetic and invoice issuing
//! - **Storage** (`db`): embedded redb store and per-entity repositories
//! - **Auth** (`auth`): JWT + Argon2 authentication and permissions
//! - **Events** (`message`): in-process broadcast bus for the floor,
//!   kitchen and waiter displays
//! - **HTTP API** (`api`): RESTful interface
//!
//! # Module structure
//!
//! ```text
//! comanda-server/src/
//! ├── core/          # config, state, server assembly
//! ├── auth/          # JWT auth, permissions, password hashing
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # redb store and repositories
//! ├── message/       # event bus
//! ├── orders/        # order lifecycle and invoices
//! └── utils/         # error envelope, logger
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod message;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::{EventPublisher, MessageBus};
pub use orders::OrdersManager;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

// Security logging macro - structured fields on the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   ______                                 _
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
