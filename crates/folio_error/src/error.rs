//! Top-level error wrapper types.

use crate::{ConfigError, MediaError, StorageError, StorageErrorKind, ThumbnailError};

/// Every error a Folio operation can surface.
///
/// # Examples
///
/// ```
/// use folio_error::{FolioError, FolioErrorKind, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::NotFound("uploads/a.png".into()));
/// let err: FolioError = storage_err.into();
/// assert!(matches!(err.kind(), FolioErrorKind::Storage(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FolioErrorKind {
    /// Storage port error
    #[from(StorageError)]
    Storage(StorageError),
    /// Thumbnail derivation error
    #[from(ThumbnailError)]
    Thumbnail(ThumbnailError),
    /// Upload or deletion orchestration error
    #[from(MediaError)]
    Media(MediaError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Folio error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Folio Error: {}", _0)]
pub struct FolioError(Box<FolioErrorKind>);

impl FolioError {
    /// Create a new error from a kind.
    pub fn new(kind: FolioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FolioErrorKind {
        &self.0
    }

    /// Human-readable reason, without the location suffix.
    pub fn reason(&self) -> String {
        match self.kind() {
            FolioErrorKind::Storage(e) => e.kind().to_string(),
            FolioErrorKind::Thumbnail(e) => e.kind().to_string(),
            FolioErrorKind::Media(e) => e.kind().to_string(),
            FolioErrorKind::Config(e) => e.message.clone(),
        }
    }

    /// The storage kind, if this is a storage error.
    pub fn storage_kind(&self) -> Option<&StorageErrorKind> {
        match self.kind() {
            FolioErrorKind::Storage(e) => Some(e.kind()),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to FolioErrorKind
impl<T> From<T> for FolioError
where
    T: Into<FolioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Folio operations.
pub type FolioResult<T> = std::result::Result<T, FolioError>;
