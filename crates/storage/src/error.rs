//! Media store error types.

use thiserror::Error;

/// Media store operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for media store operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
