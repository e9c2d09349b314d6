//! Product API handlers
//!
//! Covers products and their modifier tree. Deletes are guarded by the
//! repositories: a product or option on an ACTIVE order is refused with a
//! conflict, closed orders render from their own snapshots.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{ModifierGroupRepository, ModifierOptionRepository, ProductRepository};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::models::{
    ModifierGroup, ModifierGroupCreate, ModifierGroupUpdate, ModifierOption, ModifierOptionCreate,
    ModifierOptionUpdate, Product, ProductCreate, ProductUpdate, ProductWithModifiers,
};

// ========== Products ==========

/// GET /api/products - all products in display order
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.store.clone());
    let products = repo.find_all(user.owner_id)?;
    Ok(Json(products))
}

/// GET /api/products/{id} - product with category and modifier tree
///
/// One consistent read; groups and options arrive in `(sort_order, id)`
/// order so clients can render the customization dialog directly.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<ProductWithModifiers>> {
    let repo = ProductRepository::new(state.store.clone());
    let product = repo
        .find_with_modifiers(user.owner_id, id)?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// POST /api/products - create a product
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.store.clone());
    let product = repo.create(user.owner_id, payload)?;
    Ok(Json(product))
}

/// PUT /api/products/{id} - update a product
///
/// Price and name changes never touch existing order items; those hold
/// their own add-time snapshots.
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.store.clone());
    let product = repo.update(user.owner_id, id, payload)?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - delete a product, cascading its modifiers
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = ProductRepository::new(state.store.clone());
    repo.delete(user.owner_id, id)?;
    Ok(ok_with_message((), format!("Product {} deleted", id)))
}

// ========== Modifier groups ==========

/// GET /api/products/{id}/modifier-groups - groups on a product
pub async fn list_groups(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<Vec<ModifierGroup>>> {
    let repo = ModifierGroupRepository::new(state.store.clone());
    let groups = repo.find_by_product(user.owner_id, id)?;
    Ok(Json(groups))
}

/// POST /api/products/{id}/modifier-groups - add a group to a product
pub async fn create_group(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
    Json(payload): Json<ModifierGroupCreate>,
) -> AppResult<Json<ModifierGroup>> {
    let repo = ModifierGroupRepository::new(state.store.clone());
    let group = repo.create(user.owner_id, id, payload)?;
    Ok(Json(group))
}

/// PUT /api/modifier-groups/{id} - update a group
pub async fn update_group(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
    Json(payload): Json<ModifierGroupUpdate>,
) -> AppResult<Json<ModifierGroup>> {
    let repo = ModifierGroupRepository::new(state.store.clone());
    let group = repo.update(user.owner_id, id, payload)?;
    Ok(Json(group))
}

/// DELETE /api/modifier-groups/{id} - delete a group and its options
pub async fn delete_group(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = ModifierGroupRepository::new(state.store.clone());
    repo.delete(user.owner_id, id)?;
    Ok(ok_with_message((), format!("Modifier group {} deleted", id)))
}

// ========== Modifier options ==========

/// GET /api/modifier-groups/{id}/options - options in a group
pub async fn list_options(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<Vec<ModifierOption>>> {
    let repo = ModifierOptionRepository::new(state.store.clone());
    let options = repo.find_by_group(user.owner_id, id)?;
    Ok(Json(options))
}

/// POST /api/modifier-groups/{id}/options - add an option to a group
pub async fn create_option(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
    Json(payload): Json<ModifierOptionCreate>,
) -> AppResult<Json<ModifierOption>> {
    let repo = ModifierOptionRepository::new(state.store.clone());
    let option = repo.create(user.owner_id, id, payload)?;
    Ok(Json(option))
}

/// PUT /api/modifier-options/{id} - update an option
pub async fn update_option(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
    Json(payload): Json<ModifierOptionUpdate>,
) -> AppResult<Json<ModifierOption>> {
    let repo = ModifierOptionRepository::new(state.store.clone());
    let option = repo.update(user.owner_id, id, payload)?;
    Ok(Json(option))
}

/// DELETE /api/modifier-options/{id} - delete an option
pub async fn delete_option(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = ModifierOptionRepository::new(state.store.clone());
    repo.delete(user.owner_id, id)?;
    Ok(ok_with_message((), format!("Modifier option {} deleted", id)))
}
