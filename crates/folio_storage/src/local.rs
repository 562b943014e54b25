//! Filesystem-based storage implementation.
//!
//! This backend maps each key directly onto a path below a root directory.

use crate::{BackendKind, LocalLayout, MediaStorage, Namespace, StorageKey, StoredObject};
use bytes::Bytes;
use folio_error::{FolioResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Filesystem storage backend.
///
/// Stores objects at `{root}/{key}`:
///
/// ```text
/// /var/folio/media/
/// ├── uploads/
/// │   └── 1b4e28ba-2fa1-11d2-883f-0016d3cca427.png
/// └── thumbnails/
///     ├── thumb_small_1b4e28ba-2fa1-11d2-883f-0016d3cca427.png
///     ├── thumb_medium_1b4e28ba-2fa1-11d2-883f-0016d3cca427.png
///     └── thumb_large_1b4e28ba-2fa1-11d2-883f-0016d3cca427.png
/// ```
///
/// With [`LocalLayout::Flat`] the `uploads/` level is dropped, so originals
/// sit directly in the root next to the `thumbnails/` directory.
///
/// # Features
///
/// - **Atomic writes**: Uses a uniquely named temp file + rename, so a
///   partially written object is never visible under its key
/// - **Lazy namespaces**: Parent directories are created on first write
/// - **Stable references**: Links are `file://` URLs of the stored file
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    layout: LocalLayout,
}

impl LocalStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the root directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> FolioResult<Self> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        // Links are file URLs, which require an absolute path
        let root = std::fs::canonicalize(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::info!(path = %root.display(), "Created filesystem storage");
        Ok(Self {
            root,
            layout: LocalLayout::default(),
        })
    }

    /// Use `layout` to map keys onto paths.
    pub fn with_layout(mut self, layout: LocalLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Root directory of this backend.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path layout below the root.
    pub fn layout(&self) -> LocalLayout {
        self.layout
    }

    /// Get the filesystem path for a key.
    pub fn object_path(&self, key: &StorageKey) -> PathBuf {
        let skip = match (self.layout, key.namespace()) {
            (LocalLayout::Flat, Some(Namespace::Uploads)) => 1,
            _ => 0,
        };
        key.segments()
            .skip(skip)
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    /// Whether a regular file is stored at `path`.
    ///
    /// Directories and paths running through a file are not objects.
    async fn is_object(path: &Path) -> FolioResult<bool> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(false)
            }
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    fn reference_for(path: &Path) -> FolioResult<String> {
        Url::from_file_path(path)
            .map(|url| url.to_string())
            .map_err(|_| {
                StorageError::new(StorageErrorKind::InvalidKey(format!(
                    "{} cannot be expressed as a file URL",
                    path.display()
                )))
                .into()
            })
    }

    /// Write to a temp file next to `path`, then rename into place.
    async fn atomic_write(path: &Path, data: &[u8]) -> FolioResult<()> {
        let parent = path.parent().ok_or_else(|| {
            StorageError::new(StorageErrorKind::InvalidKey(format!(
                "{} has no parent directory",
                path.display()
            )))
        })?;

        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        if let Err(e) = tokio::fs::write(&temp_path, data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
            .into());
        }

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl MediaStorage for LocalStorage {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    #[tracing::instrument(skip(self, data), fields(key = %key, size = data.len()))]
    async fn store(
        &self,
        data: Bytes,
        key: &StorageKey,
        content_type: &str,
    ) -> FolioResult<StoredObject> {
        let path = self.object_path(key);
        Self::atomic_write(&path, &data).await?;
        let reference = Self::reference_for(&path)?;

        tracing::info!(
            path = %path.display(),
            size = data.len(),
            content_type,
            "Stored object locally"
        );

        Ok(StoredObject::new(
            key.clone(),
            content_type,
            &data,
            BackendKind::Local,
            reference,
        ))
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn retrieve(&self, key: &StorageKey) -> FolioResult<Bytes> {
        let path = self.object_path(key);
        if !Self::is_object(&path).await? {
            return Err(StorageError::new(StorageErrorKind::NotFound(key.to_string())).into());
        }

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(key.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(path = %path.display(), size = data.len(), "Retrieved object");
        Ok(Bytes::from(data))
    }

    async fn retrieve_link(
        &self,
        key: &StorageKey,
        _ttl: Duration,
    ) -> FolioResult<Option<String>> {
        // Local links are stable and never expire
        let path = self.object_path(key);
        if !Self::is_object(&path).await? {
            return Ok(None);
        }
        Self::reference_for(&path).map(Some)
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn delete(&self, key: &StorageKey) -> FolioResult<()> {
        let path = self.object_path(key);
        if !Self::is_object(&path).await? {
            tracing::debug!(path = %path.display(), "Object already absent");
            return Ok(());
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Deleted object locally");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Object already absent");
                Ok(())
            }
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    async fn exists(&self, key: &StorageKey) -> FolioResult<bool> {
        Self::is_object(&self.object_path(key)).await
    }
}
