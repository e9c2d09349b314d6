//! Restaurant settings API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Build settings router
///
/// No permission layer here: both handlers check the owner capability
/// themselves via [`crate::auth::CurrentUser::can_manage`].
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/settings",
        get(handler::get_settings).put(handler::update_settings),
    )
}
