//! Upload and deletion orchestration error types.

/// Kinds of media orchestration errors.
///
/// Only [`UploadFailed`](MediaErrorKind::UploadFailed) and
/// [`InvalidUpload`](MediaErrorKind::InvalidUpload) are ever returned as an
/// `Err`. The per-artifact kinds are reported inside upload and deletion
/// reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MediaErrorKind {
    /// Persisting the original object failed; fatal to the whole upload
    #[display("Upload failed: {}", _0)]
    UploadFailed(String),
    /// The upload was rejected before any storage call
    #[display("Invalid upload: {}", _0)]
    InvalidUpload(String),
    /// Persisting one derived size failed
    #[display("Failed to persist {} thumbnail: {}", size, reason)]
    ThumbnailPersistFailed {
        /// Size class name
        size: String,
        /// Backend reason
        reason: String,
    },
    /// Deleting one object failed
    #[display("Failed to delete {}: {}", key, reason)]
    DeleteFailed {
        /// Key of the object that could not be deleted
        key: String,
        /// Backend reason
        reason: String,
    },
}

/// Media orchestration error with location tracking.
///
/// # Examples
///
/// ```
/// use folio_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::UploadFailed("disk full".to_string()));
/// assert!(format!("{}", err).contains("disk full"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MediaErrorKind {
        &self.kind
    }
}
