//! HTTP request handlers.

pub mod common;
pub mod decks;
pub mod flashcards;
pub mod health;
pub mod images;
pub mod transfer;

pub use decks::*;
pub use flashcards::*;
pub use health::*;
pub use images::*;
pub use transfer::*;
