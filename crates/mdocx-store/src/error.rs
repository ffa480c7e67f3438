//! Error types for store operations

use thiserror::Error;

/// Errors that can occur while reading or writing the store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No stored file has this id
    #[error("No stored file with id {0}")]
    NotFound(i64),

    /// Error from the database driver
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
