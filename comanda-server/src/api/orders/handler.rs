//! Order API handlers
//!
//! Thin shims over the orders manager: extract the principal, forward,
//! map [`crate::orders::OrderError`] into the HTTP envelope via `?`.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::Invoice;
use shared::order::{
    Order, OrderCreate, OrderItemAdd, OrderItemQuantityUpdate, OrderTransition, SplitPlan,
};

/// POST /api/orders/{id}/close response
#[derive(Debug, Serialize)]
pub struct CloseResponse {
    pub order: Order,
    pub invoice: Invoice,
}

/// POST /api/orders/{id}/split-close response
#[derive(Debug, Serialize)]
pub struct SplitCloseResponse {
    pub order: Order,
    /// One invoice per split group, in plan order
    pub invoices: Vec<Invoice>,
}

/// GET /api/orders - all active (non-terminal) orders
pub async fn list_active(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_active(user.owner_id)?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - one order with its items
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get_order(user.owner_id, &id)?;
    Ok(Json(order))
}

/// POST /api/orders - open an order on a table
///
/// Claims the table atomically; a second open on the same table gets a
/// conflict, not a duplicate order.
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .open_order(user.owner_id, user.id, &user.display_name, payload.table_id)?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/items - add a line to an OPEN order
pub async fn add_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<OrderItemAdd>,
) -> AppResult<Json<Order>> {
    let order = state.orders.add_item(user.owner_id, &id, &payload)?;
    Ok(Json(order))
}

/// PUT /api/orders/{id}/items/{item_id} - change a line quantity
///
/// A quantity of zero or below removes the line.
pub async fn update_item_quantity(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, item_id)): Path<(String, String)>,
    Json(payload): Json<OrderItemQuantityUpdate>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .update_item_quantity(user.owner_id, &id, &item_id, payload.quantity)?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id}/items/{item_id} - remove a line
pub async fn remove_item(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, item_id)): Path<(String, String)>,
) -> AppResult<Json<Order>> {
    let order = state.orders.remove_item(user.owner_id, &id, &item_id)?;
    Ok(Json(order))
}

/// PUT /api/orders/{id}/status - request a status transition
///
/// COOKING sends the kitchen ticket, READY alerts the waiters, OPEN from
/// COOKING is the pull-back. CLOSED and CANCELED route through the close
/// and cancel paths with their table release and invoice side effects.
pub async fn transition(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<OrderTransition>,
) -> AppResult<Json<Order>> {
    let order = state.orders.transition(user.owner_id, &id, payload.status)?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/close - close and issue one invoice
pub async fn close(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<CloseResponse>> {
    let (order, invoice) = state.orders.close_order(user.owner_id, &id)?;
    Ok(Json(CloseResponse { order, invoice }))
}

/// POST /api/orders/{id}/split-close - close with one invoice per group
///
/// The plan must partition the order's items exactly; otherwise nothing
/// changes and the validation error names what is wrong.
pub async fn close_with_splits(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<SplitPlan>,
) -> AppResult<Json<SplitCloseResponse>> {
    let (order, invoices) = state.orders.close_with_splits(user.owner_id, &id, &payload)?;
    Ok(Json(SplitCloseResponse { order, invoices }))
}

/// POST /api/orders/{id}/cancel - cancel, free the table, no invoice
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.cancel_order(user.owner_id, &id)?;
    Ok(Json(order))
}
