//! Storage port definition.

use crate::{BackendKind, StorageKey, StoredObject};
use bytes::Bytes;
use folio_error::FolioResult;
use std::sync::Arc;
use std::time::Duration;

/// Capability contract shared by the local and remote backends.
///
/// Every operation resolves to exactly one of success or failure; there is
/// no "maybe stored" outcome.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Backend this implementation writes to.
    fn kind(&self) -> BackendKind;

    /// Store `data` under `key`.
    ///
    /// Containing directories or prefixes are created on demand. A write that
    /// cannot complete in full is reported as a failure, never as a truncated
    /// success.
    ///
    /// # Arguments
    ///
    /// * `data` - The complete object payload
    /// * `key` - Destination key
    /// * `content_type` - MIME type recorded with the object
    async fn store(
        &self,
        data: Bytes,
        key: &StorageKey,
        content_type: &str,
    ) -> FolioResult<StoredObject>;

    /// Read the full object back.
    async fn retrieve(&self, key: &StorageKey) -> FolioResult<Bytes>;

    /// Get a link for direct access to the object.
    ///
    /// Remote backends return a signed URL valid for `ttl` from the moment of
    /// the call; a fresh one is produced on every call. Local backends ignore
    /// `ttl` and return a stable reference, or `None` when the object is absent.
    async fn retrieve_link(&self, key: &StorageKey, ttl: Duration)
    -> FolioResult<Option<String>>;

    /// Delete the object.
    ///
    /// Idempotent: deleting a key that does not exist succeeds.
    async fn delete(&self, key: &StorageKey) -> FolioResult<()>;

    /// Check if the object exists.
    async fn exists(&self, key: &StorageKey) -> FolioResult<bool>;
}

#[async_trait::async_trait]
impl<T> MediaStorage for Arc<T>
where
    T: MediaStorage + ?Sized,
{
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    async fn store(
        &self,
        data: Bytes,
        key: &StorageKey,
        content_type: &str,
    ) -> FolioResult<StoredObject> {
        (**self).store(data, key, content_type).await
    }

    async fn retrieve(&self, key: &StorageKey) -> FolioResult<Bytes> {
        (**self).retrieve(key).await
    }

    async fn retrieve_link(
        &self,
        key: &StorageKey,
        ttl: Duration,
    ) -> FolioResult<Option<String>> {
        (**self).retrieve_link(key, ttl).await
    }

    async fn delete(&self, key: &StorageKey) -> FolioResult<()> {
        (**self).delete(key).await
    }

    async fn exists(&self, key: &StorageKey) -> FolioResult<bool> {
        (**self).exists(key).await
    }
}
