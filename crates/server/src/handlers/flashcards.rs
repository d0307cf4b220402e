//! Flashcard endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{delete_image_if_present, read_json, require_text, rfc3339};
use crate::handlers::decks::{MessageResponse, require_deck};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use cardbox_metadata::models::FlashcardRow;
use cardbox_metadata::repos::FlashcardRepo;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request to create a new flashcard.
#[derive(Debug, Deserialize)]
pub struct CreateFlashcardRequest {
    pub deck_id: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub hint: Option<String>,
}

/// Request to update a flashcard's text fields.
#[derive(Debug, Deserialize)]
pub struct UpdateFlashcardRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub hint: Option<String>,
}

/// Flashcard details.
#[derive(Debug, Serialize)]
pub struct FlashcardResponse {
    pub id: String,
    pub deck_id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub hint: String,
    pub image: Option<String>,
    pub created_at: String,
}

/// A category facet of a deck.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: String,
    pub count: u64,
}

pub(crate) fn flashcard_to_response(card: FlashcardRow) -> ApiResult<FlashcardResponse> {
    Ok(FlashcardResponse {
        id: card.flashcard_id.to_string(),
        deck_id: card.deck_id.to_string(),
        question: card.question,
        answer: card.answer,
        category: card.category,
        hint: card.hint,
        image: card.image,
        created_at: rfc3339(card.created_at)?,
    })
}

/// Load a flashcard or fail with 404.
pub(crate) async fn require_flashcard(
    state: &AppState,
    flashcard_id: Uuid,
) -> ApiResult<FlashcardRow> {
    state
        .metadata
        .get_flashcard(flashcard_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {flashcard_id} not found")))
}

fn to_responses(cards: Vec<FlashcardRow>) -> ApiResult<Vec<FlashcardResponse>> {
    cards.into_iter().map(flashcard_to_response).collect()
}

/// GET /decks/{deck_id}/flashcards - Flashcards of a deck, newest first.
///
/// The repeatable `categories` query parameter narrows the set to cards
/// whose category is one of the given values.
pub async fn list_deck_flashcards(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<FlashcardResponse>>> {
    require_deck(&state, deck_id).await?;

    let categories: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "categories")
        .map(|(_, value)| value)
        .collect();

    let cards = state
        .metadata
        .list_flashcards_in_categories(deck_id, &categories)
        .await?;
    Ok(Json(to_responses(cards)?))
}

/// GET /decks/{deck_id}/flashcards/category/{category} - One category's cards.
pub async fn list_flashcards_by_category(
    State(state): State<AppState>,
    Path((deck_id, category)): Path<(Uuid, String)>,
) -> ApiResult<Json<Vec<FlashcardResponse>>> {
    require_deck(&state, deck_id).await?;

    let cards = state
        .metadata
        .list_flashcards_in_categories(deck_id, std::slice::from_ref(&category))
        .await?;
    Ok(Json(to_responses(cards)?))
}

/// GET /decks/{deck_id}/categories - Category facets of a deck.
///
/// Distinct non-empty categories with occurrence counts, ordered count
/// descending then name ascending.
pub async fn list_categories(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CategoryResponse>>> {
    require_deck(&state, deck_id).await?;

    let categories = state.metadata.list_categories(deck_id).await?;
    Ok(Json(
        categories
            .into_iter()
            .map(|c| CategoryResponse {
                category: c.category,
                count: c.count,
            })
            .collect(),
    ))
}

/// POST /flashcards - Create a flashcard in an existing deck.
#[tracing::instrument(skip(state, req))]
pub async fn create_flashcard(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<FlashcardResponse>)> {
    let body: CreateFlashcardRequest =
        read_json(req, state.config.server.max_json_body_bytes).await?;

    let deck_id = require_text(body.deck_id.as_deref(), "deck ID")?;
    let question = require_text(body.question.as_deref(), "question")?;
    let answer = require_text(body.answer.as_deref(), "answer")?;

    let deck_id: Uuid = deck_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid deck ID: {deck_id}")))?;
    require_deck(&state, deck_id).await?;

    let card = FlashcardRow {
        flashcard_id: Uuid::new_v4(),
        deck_id,
        question: question.to_string(),
        answer: answer.to_string(),
        category: body.category.unwrap_or_default(),
        hint: body.hint.unwrap_or_default(),
        image: None,
        created_at: OffsetDateTime::now_utc(),
    };
    state.metadata.create_flashcard(&card).await?;

    tracing::info!(flashcard_id = %card.flashcard_id, deck_id = %deck_id, "flashcard created");
    Ok((StatusCode::CREATED, Json(flashcard_to_response(card)?)))
}

/// GET /flashcards/{flashcard_id} - Flashcard details.
pub async fn get_flashcard(
    State(state): State<AppState>,
    Path(flashcard_id): Path<Uuid>,
) -> ApiResult<Json<FlashcardResponse>> {
    let card = require_flashcard(&state, flashcard_id).await?;
    Ok(Json(flashcard_to_response(card)?))
}

/// PUT /flashcards/{flashcard_id} - Overwrite a flashcard's text fields.
///
/// Omitted category/hint become empty; the image reference is never touched
/// here (it has its own lifecycle endpoints).
#[tracing::instrument(skip(state, req))]
pub async fn update_flashcard(
    State(state): State<AppState>,
    Path(flashcard_id): Path<Uuid>,
    req: Request,
) -> ApiResult<Json<FlashcardResponse>> {
    let body: UpdateFlashcardRequest =
        read_json(req, state.config.server.max_json_body_bytes).await?;

    let question = require_text(body.question.as_deref(), "question")?;
    let answer = require_text(body.answer.as_deref(), "answer")?;

    state
        .metadata
        .update_flashcard_text(
            flashcard_id,
            question,
            answer,
            body.category.as_deref().unwrap_or_default(),
            body.hint.as_deref().unwrap_or_default(),
        )
        .await?;

    let card = require_flashcard(&state, flashcard_id).await?;
    Ok(Json(flashcard_to_response(card)?))
}

/// DELETE /flashcards/{flashcard_id} - Delete a flashcard.
///
/// The referenced image file goes first so the media store never holds
/// files no record points at.
#[tracing::instrument(skip(state))]
pub async fn delete_flashcard(
    State(state): State<AppState>,
    Path(flashcard_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let card = require_flashcard(&state, flashcard_id).await?;

    delete_image_if_present(state.media.as_ref(), card.image.as_deref()).await;
    state.metadata.delete_flashcard(flashcard_id).await?;

    tracing::info!(flashcard_id = %flashcard_id, "flashcard deleted");
    Ok(Json(MessageResponse {
        message: "Flashcard deleted successfully".to_string(),
    }))
}
