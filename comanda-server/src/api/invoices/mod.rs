//! Invoice API module
//!
//! Strictly read-only: invoices are immutable financial records written
//! by the close paths, this surface only finds them again for reprints.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/invoices", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/by-number/{number}", get(handler::get_by_number))
        .layer(middleware::from_fn(require_permission("invoices:read")))
}
