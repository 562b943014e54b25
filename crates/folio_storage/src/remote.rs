//! Remote object store implementation.
//!
//! Objects live in a single S3-compatible bucket, one object per key. Every
//! call is bounded by a deadline and can be interrupted through a
//! [`CancellationToken`]; an interrupted call is always reported as a failure.

use crate::{BackendKind, MediaStorage, RemoteConfig, StorageKey, StoredObject};
use bytes::Bytes;
use folio_error::{FolioResult, StorageError, StorageErrorKind};
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{
    Attribute, AttributeValue, Attributes, ClientOptions, ObjectStore, PutOptions, PutPayload,
    RetryConfig,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default per-call deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote object store backend.
#[derive(Debug, Clone)]
pub struct RemoteStorage {
    store: Arc<dyn ObjectStore>,
    signer: Arc<dyn Signer>,
    public_base: String,
    timeout: Duration,
    cancel: CancellationToken,
}

impl RemoteStorage {
    /// Build an S3 client from `config` and verify that the bucket is reachable.
    ///
    /// The verification costs one round trip and fails fast with
    /// `BackendUnavailable` instead of deferring the failure to the first upload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if no bucket is configured, `BackendUnavailable`
    /// if the client cannot be built or the bucket cannot be listed.
    #[tracing::instrument(skip(config), fields(bucket = ?config.bucket, region = %config.region))]
    pub async fn connect(config: &RemoteConfig) -> FolioResult<Self> {
        let bucket = config
            .bucket
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::InvalidConfig(
                    "storage.remote.bucket is not set".to_string(),
                ))
            })?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let client_options = ClientOptions::new()
            .with_timeout(timeout)
            .with_connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .with_allow_http(config.allow_http);
        let retry = RetryConfig {
            max_retries: config.max_retries,
            retry_timeout: timeout,
            ..Default::default()
        };

        // Standard AWS_* variables fill whatever the config leaves unset
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(&config.region)
            .with_client_options(client_options)
            .with_retry(retry);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(access_key_id) = &config.access_key_id {
            builder = builder.with_access_key_id(access_key_id);
        }
        if let Some(secret_access_key) = &config.secret_access_key {
            builder = builder.with_secret_access_key(secret_access_key);
        }

        let s3 = Arc::new(builder.build().map_err(|e| {
            StorageError::new(StorageErrorKind::BackendUnavailable(format!(
                "failed to build S3 client: {}",
                e
            )))
        })?);

        let storage = Self::from_parts(s3.clone(), s3, config.public_base(bucket))
            .with_timeout(timeout);
        storage.verify().await?;

        tracing::info!(bucket, "Remote storage initialized");
        Ok(storage)
    }

    /// Assemble a backend from an object store and a URL signer.
    ///
    /// `public_base` is prepended to keys to form persistent object URLs.
    pub fn from_parts(
        store: Arc<dyn ObjectStore>,
        signer: Arc<dyn Signer>,
        public_base: impl Into<String>,
    ) -> Self {
        Self {
            store,
            signer,
            public_base: public_base.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }

    /// Set the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A handle sharing this client whose calls abort when `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: token,
            ..self.clone()
        }
    }

    /// Persistent URL of `key`.
    pub fn public_url(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.public_base, key)
    }

    /// Check that the bucket exists and the credentials can list it.
    #[tracing::instrument(skip(self))]
    pub async fn verify(&self) -> FolioResult<()> {
        self.guarded("verify bucket", self.store.list_with_delimiter(None))
            .await
            .map(|_| ())
            .map_err(|e| {
                StorageError::new(StorageErrorKind::BackendUnavailable(e.reason())).into()
            })
    }

    fn object_path(key: &StorageKey) -> FolioResult<ObjectPath> {
        ObjectPath::parse(key.as_str()).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidKey(format!("{}: {}", key, e))).into()
        })
    }

    /// Race `op` against the deadline and the cancellation token.
    async fn guarded<T, F>(&self, what: &str, op: F) -> FolioResult<T>
    where
        F: Future<Output = object_store::Result<T>> + Send,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StorageError::new(
                StorageErrorKind::Cancelled(what.to_string()),
            )
            .into()),
            result = tokio::time::timeout(self.timeout, op) => match result {
                Err(_) => Err(StorageError::new(StorageErrorKind::TimedOut(format!(
                    "{} after {:?}",
                    what, self.timeout
                )))
                .into()),
                Ok(Err(e)) => Err(map_store_error(what, e).into()),
                Ok(Ok(value)) => Ok(value),
            },
        }
    }
}

fn map_store_error(what: &str, err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::NotFound { path, .. } => {
            StorageError::new(StorageErrorKind::NotFound(path))
        }
        object_store::Error::InvalidPath { source } => {
            StorageError::new(StorageErrorKind::InvalidKey(source.to_string()))
        }
        other => StorageError::new(StorageErrorKind::BackendUnavailable(format!(
            "{}: {}",
            what, other
        ))),
    }
}

#[async_trait::async_trait]
impl MediaStorage for RemoteStorage {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    #[tracing::instrument(skip(self, data), fields(key = %key, size = data.len()))]
    async fn store(
        &self,
        data: Bytes,
        key: &StorageKey,
        content_type: &str,
    ) -> FolioResult<StoredObject> {
        let path = Self::object_path(key)?;

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.guarded(
            "store",
            self.store
                .put_opts(&path, PutPayload::from(data.clone()), options),
        )
        .await?;

        let reference = self.public_url(key);
        tracing::info!(reference = %reference, "Stored object remotely");

        Ok(StoredObject::new(
            key.clone(),
            content_type,
            &data,
            BackendKind::Remote,
            reference,
        ))
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn retrieve(&self, key: &StorageKey) -> FolioResult<Bytes> {
        let path = Self::object_path(key)?;
        let store = self.store.clone();
        self.guarded("retrieve", async move { store.get(&path).await?.bytes().await })
            .await
    }

    #[tracing::instrument(skip(self), fields(key = %key, ttl_secs = ttl.as_secs()))]
    async fn retrieve_link(
        &self,
        key: &StorageKey,
        ttl: Duration,
    ) -> FolioResult<Option<String>> {
        let path = Self::object_path(key)?;
        let url = self
            .guarded(
                "sign link",
                self.signer.signed_url(http::Method::GET, &path, ttl),
            )
            .await?;
        Ok(Some(url.to_string()))
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn delete(&self, key: &StorageKey) -> FolioResult<()> {
        let path = Self::object_path(key)?;
        let store = self.store.clone();
        self.guarded("delete", async move {
            match store.delete(&path).await {
                Err(object_store::Error::NotFound { .. }) => Ok(()),
                other => other,
            }
        })
        .await?;

        tracing::info!("Deleted object remotely");
        Ok(())
    }

    async fn exists(&self, key: &StorageKey) -> FolioResult<bool> {
        let path = Self::object_path(key)?;
        let store = self.store.clone();
        self.guarded("exists", async move {
            match store.head(&path).await {
                Ok(_) => Ok(true),
                Err(object_store::Error::NotFound { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await
    }
}
