//! Flashcard repository.

use crate::error::MetadataResult;
use crate::models::FlashcardRow;
use async_trait::async_trait;
use uuid::Uuid;

/// A distinct category value with its occurrence count within a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Flashcard CRUD and query operations.
#[async_trait]
pub trait FlashcardRepo: Send + Sync {
    /// Persist a new flashcard.
    async fn create_flashcard(&self, card: &FlashcardRow) -> MetadataResult<()>;

    /// Persist a batch of flashcards in a single transaction.
    ///
    /// Used by deck import; either every card lands or none do.
    async fn create_flashcards(&self, cards: &[FlashcardRow]) -> MetadataResult<()>;

    /// Fetch a flashcard by id.
    async fn get_flashcard(&self, flashcard_id: Uuid) -> MetadataResult<Option<FlashcardRow>>;

    /// Flashcards of a deck, newest first.
    async fn list_flashcards(&self, deck_id: Uuid) -> MetadataResult<Vec<FlashcardRow>>;

    /// Flashcards of a deck whose category is one of `categories`, newest
    /// first.
    async fn list_flashcards_in_categories(
        &self,
        deck_id: Uuid,
        categories: &[String],
    ) -> MetadataResult<Vec<FlashcardRow>>;

    /// Overwrite the four text fields of a flashcard, leaving the image
    /// reference untouched. Fails with `NotFound` on an unknown id.
    async fn update_flashcard_text(
        &self,
        flashcard_id: Uuid,
        question: &str,
        answer: &str,
        category: &str,
        hint: &str,
    ) -> MetadataResult<()>;

    /// Set or clear a flashcard's image reference. Fails with `NotFound` on
    /// an unknown id.
    async fn set_flashcard_image(
        &self,
        flashcard_id: Uuid,
        image: Option<&str>,
    ) -> MetadataResult<()>;

    /// Delete a flashcard row. Fails with `NotFound` on an unknown id.
    async fn delete_flashcard(&self, flashcard_id: Uuid) -> MetadataResult<()>;

    /// Delete every flashcard of a deck, returning how many rows went.
    async fn delete_deck_flashcards(&self, deck_id: Uuid) -> MetadataResult<u64>;

    /// Live flashcard count for a deck (the derived `card_count`).
    async fn count_flashcards(&self, deck_id: Uuid) -> MetadataResult<u64>;

    /// Distinct non-empty categories of a deck with occurrence counts,
    /// ordered count descending then category ascending.
    async fn list_categories(&self, deck_id: Uuid) -> MetadataResult<Vec<CategoryCount>>;
}
