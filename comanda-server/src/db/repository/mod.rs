//! Repository Module
//!
//! CRUD operations over the redb tables, one repository per entity.
//! Repositories open their own transactions; multi-entity transactions
//! (order close, table claim) belong to the orders manager.

// Catalog
pub mod category;
pub mod modifier;
pub mod product;

// Floor
pub mod dining_table;

// Accounts and configuration
pub mod settings;
pub mod staff;

// Financial records
pub mod invoice;

// Re-exports
pub use category::CategoryRepository;
pub use dining_table::DiningTableRepository;
pub use invoice::InvoiceRepository;
pub use modifier::{ModifierGroupRepository, ModifierOptionRepository};
pub use product::ProductRepository;
pub use settings::SettingsRepository;
pub use staff::StaffRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("In use: {0}")]
    InUse(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<super::StorageError> for RepoError {
    fn from(err: super::StorageError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<redb::TransactionError> for RepoError {
    fn from(err: redb::TransactionError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<redb::TableError> for RepoError {
    fn from(err: redb::TableError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<redb::StorageError> for RepoError {
    fn from(err: redb::StorageError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<redb::CommitError> for RepoError {
    fn from(err: redb::CommitError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::InUse(msg) => AppError::Conflict(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
