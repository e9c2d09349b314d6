//! Dining table API handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::DiningTableRepository;
use crate::message::EventPublisher;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use shared::message::{PosEvent, TOPIC_TABLE_EVENTS, TableChangedPayload};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatusRequest};

/// GET /api/tables - all tables with their occupancy status
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.store.clone());
    let tables = repo.find_all(user.owner_id)?;
    Ok(Json(tables))
}

/// GET /api/tables/{id} - single table
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.store.clone());
    let table = repo
        .find_by_id(user.owner_id, id)?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    Ok(Json(table))
}

/// POST /api/tables - create a table (starts AVAILABLE)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.store.clone());
    let table = repo.create(user.owner_id, payload)?;
    Ok(Json(table))
}

/// PUT /api/tables/{id} - rename a table
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.store.clone());
    let table = repo.update(user.owner_id, id, payload)?;
    Ok(Json(table))
}

/// PUT /api/tables/{id}/status - the billing signal
///
/// Staff flip an OCCUPIED table to BILLING when guests ask for the check,
/// and back if they order another round. AVAILABLE is not reachable here;
/// that edge belongs to order close/cancel.
pub async fn request_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
    Json(payload): Json<TableStatusRequest>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.store.clone());
    let table = repo.request_status(user.owner_id, id, payload.status)?;

    state.message_bus.publish(
        TOPIC_TABLE_EVENTS,
        PosEvent::table_changed(&TableChangedPayload {
            table_id: table.id,
            status: table.status,
        }),
    );

    Ok(Json(table))
}

/// DELETE /api/tables/{id} - delete a table
///
/// Refused while an active order claims it.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u64>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = DiningTableRepository::new(state.store.clone());
    repo.delete(user.owner_id, id)?;
    Ok(ok_with_message((), format!("Table {} deleted", id)))
}
