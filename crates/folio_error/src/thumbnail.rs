//! Thumbnail derivation error types.

/// Kinds of thumbnail derivation errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ThumbnailErrorKind {
    /// The input bytes could not be decoded as a raster image
    #[display("Unsupported image format: {}", _0)]
    UnsupportedFormat(String),
    /// A single size class failed to encode
    #[display("Failed to encode {} thumbnail: {}", size, reason)]
    Encode {
        /// Size class name (small, medium, large)
        size: String,
        /// Encoder failure reason
        reason: String,
    },
}

/// Thumbnail error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Thumbnail Error: {} at line {} in {}", kind, line, file)]
pub struct ThumbnailError {
    /// The kind of error that occurred
    pub kind: ThumbnailErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ThumbnailError {
    /// Create a new thumbnail error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ThumbnailErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ThumbnailErrorKind {
        &self.kind
    }
}
