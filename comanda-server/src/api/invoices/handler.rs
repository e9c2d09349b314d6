//! Invoice API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::InvoiceRepository;
use crate::utils::{AppError, AppResult};
use shared::models::Invoice;

/// Query params for listing invoices
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict to the invoices of one order (split closes have several)
    pub order_id: Option<String>,
}

/// GET /api/invoices - all invoices, optionally filtered by order
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Invoice>>> {
    let repo = InvoiceRepository::new(state.store.clone());
    let invoices = match query.order_id {
        Some(order_id) => repo.find_by_order(&order_id)?,
        None => repo.find_all()?,
    };
    Ok(Json(invoices))
}

/// GET /api/invoices/{id} - one invoice
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Invoice>> {
    let repo = InvoiceRepository::new(state.store.clone());
    let invoice = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;
    Ok(Json(invoice))
}

/// GET /api/invoices/by-number/{number} - lookup by the printed number
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(number): Path<String>,
) -> AppResult<Json<Invoice>> {
    let repo = InvoiceRepository::new(state.store.clone());
    let invoice = repo
        .find_by_number(&number)?
        .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", number)))?;
    Ok(Json(invoice))
}
