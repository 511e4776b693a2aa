//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No student record matches the given id.
    #[error("no student found with id {id}")]
    StudentNotFound { id: i64 },

    /// Database connection error.
    #[error("database connection error: {message}")]
    ConnectionError { message: String },

    /// Database query error (including constraint violations).
    #[error("database query error: {message}")]
    QueryError { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
