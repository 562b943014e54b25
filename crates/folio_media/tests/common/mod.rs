//! Shared fixtures for orchestration tests.

#![allow(dead_code)]

use bytes::Bytes;
use folio_error::FolioResult;
use folio_storage::{
    BackendKind, LocalStorage, MediaStorage, StorageError, StorageErrorKind, StorageKey,
    StoredObject,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::time::Duration;

/// Encode a `width`×`height` gradient in `format`.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Bytes {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buf, format)
        .unwrap();
    Bytes::from(buf.into_inner())
}

/// Local storage that fails chosen operations for keys containing a marker.
#[derive(Debug, Clone)]
pub struct FlakyStorage {
    pub inner: LocalStorage,
    pub fail_store: Option<String>,
    pub fail_delete: Option<String>,
}

impl FlakyStorage {
    pub fn new(inner: LocalStorage) -> Self {
        Self {
            inner,
            fail_store: None,
            fail_delete: None,
        }
    }

    pub fn failing_store(mut self, marker: &str) -> Self {
        self.fail_store = Some(marker.to_string());
        self
    }

    pub fn failing_delete(mut self, marker: &str) -> Self {
        self.fail_delete = Some(marker.to_string());
        self
    }

    fn trips(marker: &Option<String>, key: &StorageKey) -> bool {
        marker
            .as_deref()
            .is_some_and(|marker| key.as_str().contains(marker))
    }
}

#[async_trait::async_trait]
impl MediaStorage for FlakyStorage {
    fn kind(&self) -> BackendKind {
        self.inner.kind()
    }

    async fn store(
        &self,
        data: Bytes,
        key: &StorageKey,
        content_type: &str,
    ) -> FolioResult<StoredObject> {
        if Self::trips(&self.fail_store, key) {
            return Err(StorageError::new(StorageErrorKind::BackendUnavailable(
                "simulated outage".to_string(),
            ))
            .into());
        }
        self.inner.store(data, key, content_type).await
    }

    async fn retrieve(&self, key: &StorageKey) -> FolioResult<Bytes> {
        self.inner.retrieve(key).await
    }

    async fn retrieve_link(
        &self,
        key: &StorageKey,
        ttl: Duration,
    ) -> FolioResult<Option<String>> {
        self.inner.retrieve_link(key, ttl).await
    }

    async fn delete(&self, key: &StorageKey) -> FolioResult<()> {
        if Self::trips(&self.fail_delete, key) {
            return Err(StorageError::new(StorageErrorKind::BackendUnavailable(
                "simulated outage".to_string(),
            ))
            .into());
        }
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &StorageKey) -> FolioResult<bool> {
        self.inner.exists(key).await
    }
}
