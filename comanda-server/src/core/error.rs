//! Server lifecycle errors
//!
//! Boot and run failures. HTTP-facing errors live in
//! [`crate::utils::AppError`]; this type never crosses the wire.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::db::StorageError),

    #[error("Repository error: {0}")]
    Repo(#[from] crate::db::repository::RepoError),

    #[error("Server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;
