//! Media store trait definition.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Flat file store for uploaded images, keyed by generated filename.
///
/// Names are single path components; implementations must reject anything
/// that could resolve outside the store.
#[async_trait]
pub trait MediaStore: Send + Sync + 'static {
    /// Check if a file exists.
    async fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Read a file's content.
    async fn get(&self, name: &str) -> StorageResult<Bytes>;

    /// Write a file atomically, replacing any previous content.
    async fn put(&self, name: &str, data: Bytes) -> StorageResult<()>;

    /// Delete a file. Fails with `NotFound` if it does not exist.
    async fn delete(&self, name: &str) -> StorageResult<()>;

    /// List all stored filenames.
    async fn list(&self) -> StorageResult<Vec<String>>;

    /// Verify the backend is reachable and writable.
    ///
    /// The default implementation returns Ok(()), suitable for backends
    /// that don't require connectivity verification.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
