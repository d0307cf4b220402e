//! Repository traits implemented by the metadata store.

pub mod decks;
pub mod flashcards;

pub use decks::DeckRepo;
pub use flashcards::{CategoryCount, FlashcardRepo};
