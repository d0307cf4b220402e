//! Application state shared across handlers.

use cardbox_core::config::AppConfig;
use cardbox_metadata::MetadataStore;
use cardbox_storage::MediaStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Deck/flashcard metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Uploaded image store.
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            metadata,
            media,
        }
    }
}
