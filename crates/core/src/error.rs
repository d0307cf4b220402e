//! Core error types.

use thiserror::Error;

/// Validation errors raised by core types.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported image type: {0}")]
    UnsupportedImageType(String),

    #[error("image too large: {size} bytes (max {max})")]
    ImageTooLarge { size: usize, max: usize },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
