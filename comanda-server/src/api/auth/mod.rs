//! Authentication routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login: public (exempted by the global auth middleware)
/// - /api/auth/profile: requires authentication
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/profile", get(handler::profile))
}
