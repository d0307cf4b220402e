//! Image attachment endpoints and stored image serving.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::delete_image_if_present;
use crate::handlers::flashcards::{FlashcardResponse, flashcard_to_response, require_flashcard};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use cardbox_core::media;
use cardbox_metadata::repos::FlashcardRepo;
use cardbox_storage::MediaStore;
use time::OffsetDateTime;
use uuid::Uuid;

/// POST /flashcards/{flashcard_id}/image - Attach or replace an image.
///
/// Multipart with a single `image` field, image content types only, at most
/// 5 MiB. The superseded file is deleted before the new reference is saved.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    Path(flashcard_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<FlashcardResponse>> {
    let card = require_flashcard(&state, flashcard_id).await?;

    // Find the `image` field; everything else in the form is ignored.
    let field = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?;
        match field {
            Some(field) if field.name() == Some("image") => break field,
            Some(_) => continue,
            None => {
                return Err(ApiError::BadRequest(
                    "multipart field 'image' is required".to_string(),
                ));
            }
        }
    };

    let content_type = field
        .content_type()
        .ok_or_else(|| ApiError::BadRequest("image content type is required".to_string()))?
        .to_string();
    let original_name = field.file_name().map(|name| name.to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
    media::validate_image(&content_type, data.len())?;

    let file_name = media::unique_filename(
        original_name.as_deref(),
        OffsetDateTime::now_utc(),
        &mut rand::thread_rng(),
    );

    // Old file first, then the new bytes, then the reference. A crash in
    // between leaves a dangling reference, which is recoverable; the reverse
    // order would leak files nothing points at.
    delete_image_if_present(state.media.as_ref(), card.image.as_deref()).await;
    state.media.put(&file_name, data).await?;
    state
        .metadata
        .set_flashcard_image(flashcard_id, Some(&file_name))
        .await?;

    tracing::info!(flashcard_id = %flashcard_id, file = %file_name, "image attached");

    let card = require_flashcard(&state, flashcard_id).await?;
    Ok(Json(flashcard_to_response(card)?))
}

/// DELETE /flashcards/{flashcard_id}/image - Remove an attached image.
///
/// A flashcard without an image is left untouched (the operation is a
/// no-op, not an error).
#[tracing::instrument(skip(state))]
pub async fn remove_image(
    State(state): State<AppState>,
    Path(flashcard_id): Path<Uuid>,
) -> ApiResult<Json<FlashcardResponse>> {
    let card = require_flashcard(&state, flashcard_id).await?;

    if card.image.is_some() {
        delete_image_if_present(state.media.as_ref(), card.image.as_deref()).await;
        state
            .metadata
            .set_flashcard_image(flashcard_id, None)
            .await?;
        tracing::info!(flashcard_id = %flashcard_id, "image removed");
    }

    let card = require_flashcard(&state, flashcard_id).await?;
    Ok(Json(flashcard_to_response(card)?))
}

/// GET /uploads/{filename} - Serve a stored image.
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let data = state.media.get(&filename).await?;

    let headers = [
        (CONTENT_TYPE, media::content_type_for(&filename).to_string()),
        (CONTENT_LENGTH, data.len().to_string()),
    ];
    Ok((headers, data).into_response())
}
