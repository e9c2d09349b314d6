//! Authentication handlers

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::auth::password::verify_password;
use crate::core::ServerState;
use crate::db::repository::StaffRepository;
use crate::security_log;
use crate::utils::{AppError, AppResult};
use shared::models::{LoginRequest, LoginResponse, StaffProfile};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - authenticate and issue a JWT
///
/// The same error message covers unknown usernames and wrong passwords,
/// so the endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = StaffRepository::new(state.store.clone());
    let account = repo.find_by_username(&req.username)?;

    // Fixed delay before checking the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        Some(account) => {
            if !account.is_active {
                security_log!(
                    "WARN",
                    "login_disabled_account",
                    username = req.username.clone()
                );
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            let password_valid = verify_password(&req.password, &account.password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    username = req.username.clone(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::invalid_credentials());
            }

            account
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = req.username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service
        .generate_token(
            account.id,
            &account.username,
            &account.display_name,
            account.role.as_str(),
            account.owner_id,
            &account.role.permissions(),
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = account.role.as_str(),
        "Staff logged in"
    );

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.get_expiration_seconds(),
        profile: StaffProfile::from(&account),
    }))
}

/// GET /api/auth/profile - the account behind the presented token
///
/// Reads the account fresh, so a deactivation or rename after token
/// issuance is visible here before the token expires.
pub async fn profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<StaffProfile>> {
    let repo = StaffRepository::new(state.store.clone());
    let account = repo
        .find_by_id(user.owner_id, user.id)?
        .ok_or_else(|| AppError::not_found(format!("Account {} not found", user.id)))?;

    if !account.is_active {
        return Err(AppError::forbidden("Account has been disabled".to_string()));
    }

    Ok(Json(StaffProfile::from(&account)))
}
