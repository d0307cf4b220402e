//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Deck record.
///
/// `card_count` is intentionally absent: it is derived from the live
/// flashcard rows on read, never stored.
#[derive(Debug, Clone, FromRow)]
pub struct DeckRow {
    pub deck_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

/// Flashcard record.
///
/// `image` holds a media store filename when an image is attached. The
/// referenced file is owned by this row: whoever clears or replaces the
/// reference deletes the previous file first.
#[derive(Debug, Clone, FromRow)]
pub struct FlashcardRow {
    pub flashcard_id: Uuid,
    pub deck_id: Uuid,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub hint: String,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
}
