//! Deck repository.

use crate::error::MetadataResult;
use crate::models::DeckRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Deck CRUD operations.
#[async_trait]
pub trait DeckRepo: Send + Sync {
    /// Persist a new deck.
    async fn create_deck(&self, deck: &DeckRow) -> MetadataResult<()>;

    /// Fetch a deck by id.
    async fn get_deck(&self, deck_id: Uuid) -> MetadataResult<Option<DeckRow>>;

    /// All decks, newest first.
    async fn list_decks(&self) -> MetadataResult<Vec<DeckRow>>;

    /// Delete a deck row. Fails with `NotFound` if the row does not exist.
    ///
    /// This removes only the deck record; callers are responsible for
    /// cascading to the deck's flashcards (and their media files) first.
    async fn delete_deck(&self, deck_id: Uuid) -> MetadataResult<()>;
}
