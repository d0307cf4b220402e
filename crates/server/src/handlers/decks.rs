//! Deck endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{delete_image_if_present, read_json, require_text, rfc3339};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use cardbox_metadata::models::DeckRow;
use cardbox_metadata::repos::{DeckRepo, FlashcardRepo};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request to create a new deck.
#[derive(Debug, Deserialize)]
pub struct CreateDeckRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Deck details with the derived card count.
#[derive(Debug, Serialize)]
pub struct DeckResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub card_count: u64,
}

/// Response for destructive operations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) fn deck_to_response(deck: DeckRow, card_count: u64) -> ApiResult<DeckResponse> {
    Ok(DeckResponse {
        id: deck.deck_id.to_string(),
        name: deck.name,
        description: deck.description,
        created_at: rfc3339(deck.created_at)?,
        card_count,
    })
}

/// Load a deck or fail with 404.
pub(crate) async fn require_deck(state: &AppState, deck_id: Uuid) -> ApiResult<DeckRow> {
    state
        .metadata
        .get_deck(deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("deck {deck_id} not found")))
}

/// GET /decks - All decks, newest first, with card counts.
pub async fn list_decks(State(state): State<AppState>) -> ApiResult<Json<Vec<DeckResponse>>> {
    let decks = state.metadata.list_decks().await?;

    let mut responses = Vec::with_capacity(decks.len());
    for deck in decks {
        let card_count = state.metadata.count_flashcards(deck.deck_id).await?;
        responses.push(deck_to_response(deck, card_count)?);
    }

    Ok(Json(responses))
}

/// POST /decks - Create a deck.
#[tracing::instrument(skip(state, req))]
pub async fn create_deck(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<DeckResponse>)> {
    let body: CreateDeckRequest =
        read_json(req, state.config.server.max_json_body_bytes).await?;
    let name = require_text(body.name.as_deref(), "deck name")?;

    let deck = DeckRow {
        deck_id: Uuid::new_v4(),
        name: name.to_string(),
        description: body.description.unwrap_or_default(),
        created_at: OffsetDateTime::now_utc(),
    };
    state.metadata.create_deck(&deck).await?;

    tracing::info!(deck_id = %deck.deck_id, name = %deck.name, "deck created");
    Ok((StatusCode::CREATED, Json(deck_to_response(deck, 0)?)))
}

/// GET /decks/{deck_id} - Deck details.
pub async fn get_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> ApiResult<Json<DeckResponse>> {
    let deck = require_deck(&state, deck_id).await?;
    let card_count = state.metadata.count_flashcards(deck_id).await?;
    Ok(Json(deck_to_response(deck, card_count)?))
}

/// DELETE /decks/{deck_id} - Delete a deck and everything it owns.
///
/// Order matters: image files first, then flashcard rows, then the deck
/// record, so a crash mid-way leaves at worst a deck with fewer flashcards,
/// never orphaned media.
#[tracing::instrument(skip(state))]
pub async fn delete_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    require_deck(&state, deck_id).await?;

    let flashcards = state.metadata.list_flashcards(deck_id).await?;
    for card in &flashcards {
        delete_image_if_present(state.media.as_ref(), card.image.as_deref()).await;
    }

    let removed = state.metadata.delete_deck_flashcards(deck_id).await?;
    state.metadata.delete_deck(deck_id).await?;

    tracing::info!(deck_id = %deck_id, flashcards = removed, "deck deleted");
    Ok(Json(MessageResponse {
        message: "Deck deleted successfully".to_string(),
    }))
}
