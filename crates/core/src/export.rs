//! Deck export/import document format.
//!
//! An export document is a self-contained snapshot of one deck and its
//! flashcards, suitable for download and later re-import. Images are
//! intentionally excluded: they live in the media store and do not travel
//! with the document.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Format version tag written into every export document.
pub const EXPORT_VERSION: &str = "1.0";

/// A complete deck export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckExport {
    pub deck: ExportedDeck,
    pub flashcards: Vec<ExportedCard>,
    #[serde(with = "time::serde::rfc3339")]
    pub export_date: OffsetDateTime,
    pub version: String,
}

/// Deck snapshot inside an export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedDeck {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Flashcard snapshot inside an export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedCard {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub hint: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Suggested download filename for an export: the deck name with whitespace
/// runs collapsed to underscores, suffixed with the export time in unix
/// milliseconds.
pub fn export_file_name(deck_name: &str, exported_at: OffsetDateTime) -> String {
    let base: Vec<&str> = deck_name.split_whitespace().collect();
    let millis = exported_at.unix_timestamp_nanos() / 1_000_000;
    format!("{}_{}.json", base.join("_"), millis)
}

/// Import request payload: `{ deckData, flashcardsData }`.
///
/// Validated against this explicit schema at the service boundary; unknown
/// fields are ignored, supplied ids and timestamps are not trusted (an import
/// always creates a fresh deck).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckImport {
    pub deck_data: ImportedDeck,
    #[serde(default)]
    pub flashcards_data: Vec<ImportedCard>,
}

/// Deck fields accepted on import.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedDeck {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Flashcard fields accepted on import. Category and hint default to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedCard {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub hint: String,
}

impl DeckImport {
    /// Validate the payload and return the trimmed deck name.
    pub fn deck_name(&self) -> Result<&str> {
        match self.deck_data.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(Error::InvalidInput("deck name is required".to_string())),
        }
    }
}
