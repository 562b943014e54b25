//! Process-wide wiring of configuration, backend and orchestrators.

use derive_getters::Getters;
use folio_error::FolioResult;
use folio_media::{DeletionOrchestrator, FolioConfig, UploadOrchestrator, UploadPolicy};
use folio_storage::{BackendSelector, CancellationToken, MediaStorage, StorageBackend, StorageKey};
use std::time::Duration;

/// A started Folio instance.
///
/// Built once at startup; the backend it holds is the one that won
/// selection and is never re-evaluated.
#[derive(Debug, Clone, Getters)]
pub struct Folio {
    /// Configuration the instance was started with
    config: FolioConfig,
    /// Selected backend
    backend: StorageBackend,
    /// Why a preferred remote backend was replaced, if it was
    downgrade: Option<String>,
    /// Upload orchestrator over the selected backend
    uploads: UploadOrchestrator<StorageBackend>,
    /// Deletion orchestrator over the selected backend
    deletions: DeletionOrchestrator<StorageBackend>,
}

impl Folio {
    /// Select a backend and wire the orchestrators to it.
    ///
    /// Remote calls made through this instance abort when `cancel` fires.
    #[tracing::instrument(skip_all, fields(prefer_remote = config.storage.prefer_remote))]
    pub async fn start(config: FolioConfig, cancel: CancellationToken) -> FolioResult<Self> {
        let selection = BackendSelector::select(&config.storage).await?;
        let downgrade = selection.downgrade().clone();
        let backend = selection.into_backend().with_cancellation(cancel);

        let policy = UploadPolicy::from(&config.media);
        Ok(Self {
            uploads: UploadOrchestrator::new(backend.clone(), policy),
            deletions: DeletionOrchestrator::new(backend.clone()),
            backend,
            downgrade,
            config,
        })
    }

    /// Link to `key`, valid for `ttl` or the configured default.
    pub async fn link(
        &self,
        key: &StorageKey,
        ttl: Option<Duration>,
    ) -> FolioResult<Option<String>> {
        let ttl = ttl.unwrap_or_else(|| self.config.media.link_ttl());
        self.backend.retrieve_link(key, ttl).await
    }
}
