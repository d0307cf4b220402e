//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use axum::extract::Request;
use cardbox_storage::{MediaStore, StorageError};
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Read and parse a JSON request body, mapping failures to 400s.
pub async fn read_json<T: DeserializeOwned>(req: Request, limit: usize) -> ApiResult<T> {
    let bytes = axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

/// Require a non-blank text field, returning its trimmed value.
pub fn require_text<'a>(value: Option<&'a str>, what: &str) -> ApiResult<&'a str> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ApiError::BadRequest(format!("{what} is required"))),
    }
}

/// Format a timestamp for API responses.
pub fn rfc3339(at: OffsetDateTime) -> ApiResult<String> {
    at.format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format timestamp: {e}")))
}

/// Best-effort deletion of a referenced image file.
///
/// A file that is already gone is not an error; anything else is logged and
/// swallowed so that the record mutation it accompanies still goes through.
pub async fn delete_image_if_present(media: &dyn MediaStore, image: Option<&str>) {
    let Some(name) = image else { return };
    match media.delete(name).await {
        Ok(()) => {}
        Err(StorageError::NotFound(_)) => {
            tracing::debug!(file = %name, "image file already absent");
        }
        Err(e) => {
            tracing::warn!(file = %name, error = %e, "failed to delete image file");
        }
    }
}
