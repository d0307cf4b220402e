//! HTTP API server for the cardbox flashcard service.
//!
//! This crate provides the REST surface:
//! - Deck CRUD with cascade delete (flashcards and their image files go
//!   before the deck record)
//! - Flashcard CRUD with image attach/replace/remove lifecycle
//! - Category listing and category-filtered flashcard queries
//! - Deck export/import documents
//! - Static serving of stored images

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
