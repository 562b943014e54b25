//! Deletion orchestration.

use crate::UniqueName;
use derive_getters::Getters;
use folio_error::MediaErrorKind;
use folio_storage::{MediaStorage, Namespace, StorageKey};
use folio_thumbnail::ThumbnailSize;
use futures::future::join_all;
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};

/// One object that could not be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Getters, serde::Serialize)]
pub struct DeletionFailure {
    /// Key (or unparseable reference) of the object
    key: String,
    /// Human-readable reason
    reason: String,
}

impl DeletionFailure {
    fn new(key: impl Into<String>, reason: String) -> Self {
        let key = key.into();
        let reason = MediaErrorKind::DeleteFailed {
            key: key.clone(),
            reason,
        }
        .to_string();
        Self { key, reason }
    }
}

/// Outcome of deleting an original and its thumbnails.
///
/// Every requested object is attempted; the report lists which were removed
/// and which were not.
#[derive(Debug, Clone, Default, Getters, serde::Serialize)]
pub struct DeletionReport {
    /// Keys confirmed deleted (or already absent)
    deleted: Vec<StorageKey>,
    /// Objects that could not be deleted
    failures: Vec<DeletionFailure>,
}

impl DeletionReport {
    /// True when nothing failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// True only when every attempted delete failed.
    pub fn is_total_failure(&self) -> bool {
        self.deleted.is_empty() && !self.failures.is_empty()
    }

    /// Failure reasons as plain strings.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.reason.clone()).collect()
    }
}

/// Deletes an original together with its derived thumbnails.
///
/// Deletes are issued independently; one failure never stops the others.
#[derive(Debug, Clone)]
pub struct DeletionOrchestrator<S> {
    storage: S,
}

impl<S: MediaStorage> DeletionOrchestrator<S> {
    /// Orchestrator deleting through `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Storage port deletes are issued through.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Delete `original` and every key in `thumbnails`.
    #[instrument(
        skip(self, thumbnails),
        fields(original = %original, thumbnails = thumbnails.len())
    )]
    pub async fn delete_with_thumbnails(
        &self,
        original: &StorageKey,
        thumbnails: &[StorageKey],
    ) -> DeletionReport {
        let targets: Vec<&StorageKey> = std::iter::once(original).chain(thumbnails).collect();
        let outcomes = join_all(targets.iter().map(|key| self.storage.delete(key))).await;

        let mut report = DeletionReport::default();
        for (key, outcome) in targets.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.deleted.push(key.clone()),
                Err(e) => {
                    warn!(key = %key, error = %e.reason(), "Delete failed");
                    report
                        .failures
                        .push(DeletionFailure::new(key.as_str(), e.reason()));
                }
            }
        }

        info!(
            deleted = report.deleted.len(),
            failed = report.failures.len(),
            "Deletion finished"
        );
        report
    }

    /// Delete `original` and the thumbnails named by previously issued references.
    ///
    /// Each reference (URL, path or bare file name) is reduced to its file
    /// name under `thumbnails/`. References that do not yield a valid key are
    /// reported as failures without a storage call.
    pub async fn delete_with_references(
        &self,
        original: &StorageKey,
        references: &[&str],
    ) -> DeletionReport {
        let mut keys = Vec::new();
        let mut rejected = Vec::new();
        for reference in references {
            match StorageKey::from_reference(reference, Namespace::Thumbnails) {
                Ok(key) => keys.push(key),
                Err(e) => rejected.push(DeletionFailure::new(*reference, e.reason())),
            }
        }

        let mut report = self.delete_with_thumbnails(original, &keys).await;
        report.failures.extend(rejected);
        report
    }

    /// Delete `original` and every thumbnail size that could exist for it.
    ///
    /// Sizes that were never stored are simply absent, which deletes as a
    /// success.
    pub async fn delete_all_sizes(&self, original: &StorageKey) -> DeletionReport {
        let keys: Vec<StorageKey> = UniqueName::from_original_key(original)
            .map(|name| {
                ThumbnailSize::iter()
                    .filter_map(|size| name.thumbnail_key(size).ok())
                    .collect()
            })
            .unwrap_or_default();
        self.delete_with_thumbnails(original, &keys).await
    }
}
