//! Order API module
//!
//! The order lifecycle surface. Every mutation goes through the
//! [`crate::orders::OrdersManager`], which owns the multi-table
//! transactions and the post-commit event publication.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_active))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("orders:read")));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/items", post(handler::add_item))
        .route(
            "/{id}/items/{item_id}",
            put(handler::update_item_quantity).delete(handler::remove_item),
        )
        .route("/{id}/status", put(handler::transition))
        .route("/{id}/close", post(handler::close))
        .route("/{id}/split-close", post(handler::close_with_splits))
        .route("/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_permission("orders:manage")));

    read_routes.merge(manage_routes)
}
