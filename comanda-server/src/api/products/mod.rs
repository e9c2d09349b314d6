//! Product API module
//!
//! Also hosts the modifier group and option routes: a group belongs to
//! exactly one product and an option to exactly one group, so the whole
//! customization tree is managed from here.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/modifier-groups", group_routes())
        .nest("/api/modifier-options", option_routes())
}

fn product_routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/modifier-groups", get(handler::list_groups))
        .layer(middleware::from_fn(require_permission("catalog:read")));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/modifier-groups", post(handler::create_group))
        .layer(middleware::from_fn(require_permission("catalog:manage")));

    read_routes.merge(manage_routes)
}

fn group_routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/{id}/options", get(handler::list_options))
        .layer(middleware::from_fn(require_permission("catalog:read")));

    let manage_routes = Router::new()
        .route(
            "/{id}",
            put(handler::update_group).delete(handler::delete_group),
        )
        .route("/{id}/options", post(handler::create_option))
        .layer(middleware::from_fn(require_permission("catalog:manage")));

    read_routes.merge(manage_routes)
}

fn option_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/{id}",
            put(handler::update_option).delete(handler::delete_option),
        )
        .layer(middleware::from_fn(require_permission("catalog:manage")))
}
