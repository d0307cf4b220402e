//! Media storage abstraction and backend for cardbox.
//!
//! Uploaded flashcard images live here as flat files, referenced by
//! filename from flashcard records. The store is deliberately dumb: the
//! image lifecycle (delete-before-replace, cascade on deck deletion) is the
//! service's responsibility.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::MediaStore;

use cardbox_core::config::MediaConfig;
use std::sync::Arc;

/// Create a media store from configuration.
pub async fn from_config(config: &MediaConfig) -> StorageResult<Arc<dyn MediaStore>> {
    match config {
        MediaConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
    }
}
