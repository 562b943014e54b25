//! One-shot backend selection.

use crate::{
    BackendKind, LocalStorage, MediaStorage, RemoteStorage, StorageConfig, StorageKey,
    StoredObject,
};
use bytes::Bytes;
use derive_getters::Getters;
use folio_error::FolioResult;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The backend chosen at startup.
///
/// Exactly one of two shapes; downstream code holds it behind the
/// [`MediaStorage`] contract and never branches on which one it got.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Local filesystem backend
    Local(LocalStorage),
    /// Remote object store backend
    Remote(RemoteStorage),
}

impl StorageBackend {
    /// A handle whose remote calls abort when `token` is cancelled.
    ///
    /// Local operations have no network suspension points and ignore the token.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        match self {
            Self::Local(local) => Self::Local(local.clone()),
            Self::Remote(remote) => Self::Remote(remote.with_cancellation(token)),
        }
    }

    fn port(&self) -> &dyn MediaStorage {
        match self {
            Self::Local(local) => local,
            Self::Remote(remote) => remote,
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for StorageBackend {
    fn kind(&self) -> BackendKind {
        self.port().kind()
    }

    async fn store(
        &self,
        data: Bytes,
        key: &StorageKey,
        content_type: &str,
    ) -> FolioResult<StoredObject> {
        self.port().store(data, key, content_type).await
    }

    async fn retrieve(&self, key: &StorageKey) -> FolioResult<Bytes> {
        self.port().retrieve(key).await
    }

    async fn retrieve_link(
        &self,
        key: &StorageKey,
        ttl: Duration,
    ) -> FolioResult<Option<String>> {
        self.port().retrieve_link(key, ttl).await
    }

    async fn delete(&self, key: &StorageKey) -> FolioResult<()> {
        self.port().delete(key).await
    }

    async fn exists(&self, key: &StorageKey) -> FolioResult<bool> {
        self.port().exists(key).await
    }
}

/// Outcome of backend selection.
#[derive(Debug, Clone, Getters)]
pub struct BackendSelection {
    /// The backend every caller will use for the rest of the process
    backend: StorageBackend,
    /// Why the remote backend was abandoned, if it was preferred but unusable
    downgrade: Option<String>,
}

impl BackendSelection {
    /// Take the selected backend.
    pub fn into_backend(self) -> StorageBackend {
        self.backend
    }

    /// Whether a preferred remote backend was replaced by the local one.
    pub fn is_downgraded(&self) -> bool {
        self.downgrade.is_some()
    }
}

/// Chooses between the remote and local backends once, at startup.
///
/// The choice is one-way: a remote backend that fails verification is
/// replaced by the local one and never retried. A new process re-evaluates
/// from scratch.
pub struct BackendSelector;

impl BackendSelector {
    /// Select a backend according to `config`.
    ///
    /// # Errors
    ///
    /// Only fails if the local backend itself cannot be created; remote
    /// failures downgrade instead.
    #[tracing::instrument(skip(config), fields(prefer_remote = config.prefer_remote))]
    pub async fn select(config: &StorageConfig) -> FolioResult<BackendSelection> {
        let mut downgrade = None;

        if config.prefer_remote {
            match RemoteStorage::connect(&config.remote).await {
                Ok(remote) => {
                    tracing::info!("Using remote object storage");
                    return Ok(BackendSelection {
                        backend: StorageBackend::Remote(remote),
                        downgrade: None,
                    });
                }
                Err(e) => {
                    let reason = e.reason();
                    tracing::warn!(
                        reason = %reason,
                        "Remote storage unavailable, falling back to local storage"
                    );
                    downgrade = Some(reason);
                }
            }
        }

        let local = LocalStorage::new(&config.local.root)?.with_layout(config.local.layout);
        if downgrade.is_none() {
            tracing::info!(
                root = %local.root().display(),
                layout = ?local.layout(),
                "Using local file storage"
            );
        }

        Ok(BackendSelection {
            backend: StorageBackend::Local(local),
            downgrade,
        })
    }
}
