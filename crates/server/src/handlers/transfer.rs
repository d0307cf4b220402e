//! Deck export and import endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::read_json;
use crate::handlers::decks::{DeckResponse, deck_to_response, require_deck};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use cardbox_core::export::{
    DeckExport, DeckImport, EXPORT_VERSION, ExportedCard, ExportedDeck, export_file_name,
};
use cardbox_metadata::models::{DeckRow, FlashcardRow};
use cardbox_metadata::repos::{DeckRepo, FlashcardRepo};
use time::OffsetDateTime;
use uuid::Uuid;

/// GET /decks/{deck_id}/export - Download a deck as a JSON document.
///
/// The document carries the deck snapshot and its flashcards in creation
/// order; images stay behind in the media store.
#[tracing::instrument(skip(state))]
pub async fn export_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> ApiResult<Response> {
    let deck = require_deck(&state, deck_id).await?;
    let cards = state.metadata.list_flashcards(deck_id).await?;

    let exported_at = OffsetDateTime::now_utc();
    let export = DeckExport {
        deck: ExportedDeck {
            name: deck.name.clone(),
            description: deck.description,
            created_at: deck.created_at,
        },
        // list_flashcards returns newest first; exports read oldest first.
        flashcards: cards
            .into_iter()
            .rev()
            .map(|card| ExportedCard {
                question: card.question,
                answer: card.answer,
                category: card.category,
                hint: card.hint,
                created_at: card.created_at,
            })
            .collect(),
        export_date: exported_at,
        version: EXPORT_VERSION.to_string(),
    };

    let body = serde_json::to_vec_pretty(&export)
        .map_err(|e| ApiError::Internal(format!("failed to serialize export: {e}")))?;

    tracing::info!(deck_id = %deck_id, cards = export.flashcards.len(), "deck exported");

    let headers = [
        (CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                export_file_name(&deck.name, exported_at)
            ),
        ),
        (CONTENT_LENGTH, body.len().to_string()),
    ];
    Ok((headers, body).into_response())
}

/// POST /decks/import - Recreate a deck from an export document.
///
/// Always creates a fresh deck; supplied ids and timestamps are ignored.
/// Not atomic across the deck/flashcards boundary: if the bulk insert
/// fails, the (empty) deck remains.
#[tracing::instrument(skip(state, req))]
pub async fn import_deck(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<DeckResponse>)> {
    let import: DeckImport = read_json(req, state.config.server.max_json_body_bytes).await?;
    let name = import.deck_name()?;

    let now = OffsetDateTime::now_utc();
    let deck = DeckRow {
        deck_id: Uuid::new_v4(),
        name: name.to_string(),
        description: import.deck_data.description.clone().unwrap_or_default(),
        created_at: now,
    };
    state.metadata.create_deck(&deck).await?;

    let cards: Vec<FlashcardRow> = import
        .flashcards_data
        .iter()
        .map(|card| FlashcardRow {
            flashcard_id: Uuid::new_v4(),
            deck_id: deck.deck_id,
            question: card.question.clone(),
            answer: card.answer.clone(),
            category: card.category.clone(),
            hint: card.hint.clone(),
            image: None,
            created_at: now,
        })
        .collect();
    state.metadata.create_flashcards(&cards).await?;

    let card_count = state.metadata.count_flashcards(deck.deck_id).await?;
    tracing::info!(deck_id = %deck.deck_id, cards = card_count, "deck imported");

    Ok((StatusCode::CREATED, Json(deck_to_response(deck, card_count)?)))
}
