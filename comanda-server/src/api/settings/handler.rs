//! Restaurant settings handlers
//!
//! Owner-only in both directions. Changing the rates here affects the
//! next invoice, never the ones already issued.

use axum::{Extension, Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::SettingsRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{RestaurantSettings, SettingsUpdate};

/// GET /api/settings - the settings document
pub async fn get_settings(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<RestaurantSettings>>> {
    if !user.can_manage(user.owner_id) {
        return Err(AppError::forbidden(
            "Settings are managed by the owner".to_string(),
        ));
    }

    let repo = SettingsRepository::new(state.store.clone());
    let settings = repo.get()?;
    Ok(ok(settings))
}

/// PUT /api/settings - update the settings document
pub async fn update_settings(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<AppResponse<RestaurantSettings>>> {
    if !user.can_manage(user.owner_id) {
        return Err(AppError::forbidden(
            "Settings are managed by the owner".to_string(),
        ));
    }

    let repo = SettingsRepository::new(state.store.clone());
    let settings = repo.update(payload)?;

    tracing::info!(
        user_id = user.id,
        tax_rate = settings.tax_rate,
        service_charge_rate = settings.service_charge_rate,
        "Restaurant settings updated"
    );

    Ok(ok_with_message(settings, "Settings updated"))
}
