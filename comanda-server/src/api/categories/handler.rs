//! Category API handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

/// GET /api/categories - all categories in display order
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.store.clone());
    let categories = repo.find_all(user.owner_id)?;
    Ok(Json(categories))
}

/// GET /api/categories/{id} - single category
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.store.clone());
    let category = repo
        .find_by_id(user.owner_id, id)?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    Ok(Json(category))
}

/// POST /api/categories - create a category
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.store.clone());
    let category = repo.create(user.owner_id, payload)?;
    Ok(Json(category))
}

/// PUT /api/categories/{id} - update a category
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.store.clone());
    let category = repo.update(user.owner_id, id, payload)?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - delete a category
///
/// Conflict while any product still references it.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = CategoryRepository::new(state.store.clone());
    repo.delete(user.owner_id, id)?;
    Ok(ok_with_message((), format!("Category {} deleted", id)))
}
