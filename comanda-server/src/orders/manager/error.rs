use crate::db::StorageError;
use crate::utils::AppError;
use shared::order::{OrderStatus, SplitPlanError};
use thiserror::Error;

/// Order aggregate rule violations and storage failures
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(u64),

    #[error("Table {0} already has an active order")]
    TableOccupied(u64),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Order items can only change while the order is OPEN (status: {0})")]
    OrderNotEditable(OrderStatus),

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Product {0} is not available for sale")]
    ProductUnavailable(u64),

    #[error("Modifier option {0} does not belong to the product")]
    ModifierNotFound(u64),

    #[error("Invalid split plan: {0}")]
    Split(#[from] SplitPlanError),
}

// Funnel the raw redb/serde errors through StorageError so `?` works on
// every storage call inside a manager transaction.
impl From<redb::TransactionError> for OrderError {
    fn from(e: redb::TransactionError) -> Self {
        OrderError::Storage(StorageError::from(e))
    }
}

impl From<redb::TableError> for OrderError {
    fn from(e: redb::TableError) -> Self {
        OrderError::Storage(StorageError::from(e))
    }
}

impl From<redb::StorageError> for OrderError {
    fn from(e: redb::StorageError) -> Self {
        OrderError::Storage(StorageError::from(e))
    }
}

impl From<redb::CommitError> for OrderError {
    fn from(e: redb::CommitError) -> Self {
        OrderError::Storage(StorageError::from(e))
    }
}

impl From<serde_json::Error> for OrderError {
    fn from(e: serde_json::Error) -> Self {
        OrderError::Storage(StorageError::from(e))
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Storage(e) => AppError::database(e.to_string()),
            OrderError::OrderNotFound(_)
            | OrderError::TableNotFound(_)
            | OrderError::ItemNotFound(_)
            | OrderError::ProductNotFound(_)
            | OrderError::ModifierNotFound(_) => AppError::not_found(err.to_string()),
            OrderError::TableOccupied(_)
            | OrderError::OrderNotEditable(_)
            | OrderError::InvalidTransition { .. } => AppError::conflict(err.to_string()),
            OrderError::InvalidQuantity(_) | OrderError::Split(_) => {
                AppError::validation(err.to_string())
            }
            OrderError::ProductUnavailable(_) => AppError::business_rule(err.to_string()),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
