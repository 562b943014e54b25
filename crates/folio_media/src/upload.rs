//! Upload orchestration.

use crate::validation::{is_raster, resolve_content_type};
use crate::{UniqueName, UploadPolicy};
use bytes::Bytes;
use derive_getters::Getters;
use folio_error::{FolioResult, MediaError, MediaErrorKind, ThumbnailError, ThumbnailErrorKind};
use folio_storage::{MediaStorage, StorageKey, StoredObject};
use folio_thumbnail::{DerivedThumbnails, ThumbnailDeriver, ThumbnailSize};
use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};
use tracing::{info, instrument, warn};

/// A non-fatal problem met while producing thumbnails.
#[derive(Debug, Clone, PartialEq, Eq, Getters, serde::Serialize)]
pub struct UploadIssue {
    /// Size class affected, or `None` when derivation failed for every size
    size: Option<ThumbnailSize>,
    /// Human-readable reason
    reason: String,
}

impl From<&ThumbnailError> for UploadIssue {
    fn from(failure: &ThumbnailError) -> Self {
        let size = match failure.kind() {
            ThumbnailErrorKind::Encode { size, .. } => size.parse().ok(),
            ThumbnailErrorKind::UnsupportedFormat(_) => None,
        };
        Self {
            size,
            reason: failure.kind().to_string(),
        }
    }
}

/// Result of a successful upload.
///
/// The original is always present. Thumbnails are best effort: any subset,
/// including none, may be present, with the reasons for missing ones listed
/// in `issues`.
#[derive(Debug, Clone, Getters, serde::Serialize)]
pub struct UploadReport {
    /// The stored original
    original: StoredObject,
    /// Stored thumbnails by size
    thumbnails: BTreeMap<ThumbnailSize, StoredObject>,
    /// Thumbnail failures that were absorbed
    issues: Vec<UploadIssue>,
}

impl UploadReport {
    /// Reference issued for the original.
    pub fn original_reference(&self) -> &str {
        self.original.reference()
    }

    /// Reference issued for each stored thumbnail.
    pub fn thumbnail_references(&self) -> BTreeMap<ThumbnailSize, &str> {
        self.thumbnails
            .iter()
            .map(|(size, object)| (*size, object.reference().as_str()))
            .collect()
    }

    /// Keys of every stored thumbnail, smallest first.
    pub fn thumbnail_keys(&self) -> Vec<StorageKey> {
        self.thumbnails
            .values()
            .map(|object| object.key().clone())
            .collect()
    }
}

/// Persists an original and its derived thumbnails.
///
/// The original is all-or-nothing: if it cannot be stored the upload fails
/// and no thumbnails are attempted. Thumbnails are stored one call per size,
/// each independently, and never roll back the original.
#[derive(Debug, Clone)]
pub struct UploadOrchestrator<S> {
    storage: S,
    deriver: ThumbnailDeriver,
    policy: UploadPolicy,
}

impl<S: MediaStorage> UploadOrchestrator<S> {
    /// Orchestrator writing to `storage` and admitting uploads per `policy`.
    pub fn new(storage: S, policy: UploadPolicy) -> Self {
        Self {
            storage,
            deriver: ThumbnailDeriver::new(),
            policy,
        }
    }

    /// Storage port uploads are written through.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Store `data` as a new original plus thumbnails when it is a raster image.
    ///
    /// # Arguments
    ///
    /// * `data` - Complete upload payload
    /// * `filename` - Client-supplied file name; only its extension is kept
    /// * `content_type` - Client-declared MIME type, used when the extension
    ///   has no fixed mapping
    ///
    /// # Errors
    ///
    /// - `InvalidUpload` when the policy rejects the file (nothing is stored)
    /// - `UploadFailed` when the original cannot be stored
    #[instrument(skip(self, data), fields(size = data.len(), backend = %self.storage.kind()))]
    pub async fn upload_with_thumbnails(
        &self,
        data: Bytes,
        filename: &str,
        content_type: Option<&str>,
    ) -> FolioResult<UploadReport> {
        let extension = self.policy.validate(filename, data.len() as u64)?;
        let name = UniqueName::generate(&extension);
        let key = name.original_key()?;
        let content_type = resolve_content_type(&extension, content_type);

        let original = self
            .storage
            .store(data.clone(), &key, &content_type)
            .await
            .map_err(|e| MediaError::new(MediaErrorKind::UploadFailed(e.reason())))?;
        info!(key = %original.key(), content_type = %content_type, "Stored original");

        let mut thumbnails = BTreeMap::new();
        let mut issues = Vec::new();

        if is_raster(&extension) {
            match self.derive(data).await {
                Ok(derived) => {
                    self.persist_thumbnails(&name, derived, &mut thumbnails, &mut issues)
                        .await
                }
                Err(reason) => {
                    warn!(key = %key, reason = %reason, "Skipping thumbnails");
                    issues.push(UploadIssue { size: None, reason });
                }
            }
        }

        Ok(UploadReport {
            original,
            thumbnails,
            issues,
        })
    }

    /// Upload from a seekable reader.
    ///
    /// The reader is rewound to its start first, so a source that was
    /// partially consumed (for example by content sniffing) is read in full.
    #[instrument(skip(self, reader))]
    pub async fn upload_reader<R>(
        &self,
        mut reader: R,
        filename: &str,
        content_type: Option<&str>,
    ) -> FolioResult<UploadReport>
    where
        R: Read + Seek,
    {
        let mut buf = Vec::new();
        reader
            .seek(SeekFrom::Start(0))
            .and_then(|_| reader.read_to_end(&mut buf))
            .map_err(|e| {
                MediaError::new(MediaErrorKind::InvalidUpload(format!(
                    "Failed to read upload: {}",
                    e
                )))
            })?;
        self.upload_with_thumbnails(Bytes::from(buf), filename, content_type)
            .await
    }

    /// Run the CPU-bound derivation off the async executor.
    async fn derive(&self, data: Bytes) -> Result<DerivedThumbnails, String> {
        let deriver = self.deriver.clone();
        match tokio::task::spawn_blocking(move || deriver.derive(&data)).await {
            Ok(Ok(derived)) => Ok(derived),
            Ok(Err(e)) => Err(e.reason()),
            Err(e) => Err(format!("Thumbnail task failed: {}", e)),
        }
    }

    async fn persist_thumbnails(
        &self,
        name: &UniqueName,
        derived: DerivedThumbnails,
        thumbnails: &mut BTreeMap<ThumbnailSize, StoredObject>,
        issues: &mut Vec<UploadIssue>,
    ) {
        let content_type = derived.format().content_type();

        issues.extend(derived.failures().iter().map(UploadIssue::from));

        for (size, thumbnail) in derived.into_thumbnails() {
            let outcome = match name.thumbnail_key(size) {
                Ok(key) => {
                    self.storage
                        .store(Bytes::from(thumbnail.into_data()), &key, content_type)
                        .await
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(stored) => {
                    info!(size = %size, key = %stored.key(), "Stored thumbnail");
                    thumbnails.insert(size, stored);
                }
                Err(e) => {
                    let kind = MediaErrorKind::ThumbnailPersistFailed {
                        size: size.to_string(),
                        reason: e.reason(),
                    };
                    warn!(size = %size, error = %kind, "Thumbnail not stored");
                    issues.push(UploadIssue {
                        size: Some(size),
                        reason: kind.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_failure_becomes_sized_issue() {
        let failure = ThumbnailError::new(ThumbnailErrorKind::Encode {
            size: "medium".to_string(),
            reason: "encoder ran out of memory".to_string(),
        });
        let issue = UploadIssue::from(&failure);
        assert_eq!(*issue.size(), Some(ThumbnailSize::Medium));
        assert!(issue.reason().contains("medium"));
        assert!(issue.reason().contains("encoder ran out of memory"));
    }

    #[test]
    fn test_decode_failure_has_no_size() {
        let failure = ThumbnailError::new(ThumbnailErrorKind::UnsupportedFormat(
            "not an image".to_string(),
        ));
        let issue = UploadIssue::from(&failure);
        assert_eq!(*issue.size(), None);
        assert!(issue.reason().contains("not an image"));
    }
}
