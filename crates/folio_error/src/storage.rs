//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// The remote backend could not be reached (network, auth, or missing namespace)
    #[display("Storage backend unavailable: {}", _0)]
    BackendUnavailable(String),
    /// The key is empty or not a well-formed object path
    #[display("Invalid key: {}", _0)]
    InvalidKey(String),
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Object not found at the specified key
    #[display("Object not found: {}", _0)]
    NotFound(String),
    /// Invalid storage configuration
    #[display("Invalid configuration: {}", _0)]
    InvalidConfig(String),
    /// The caller cancelled the operation before it completed
    #[display("Operation cancelled: {}", _0)]
    Cancelled(String),
    /// The operation did not complete within its deadline
    #[display("Operation timed out: {}", _0)]
    TimedOut(String),
}

impl StorageErrorKind {
    /// Human-readable reason carried by this kind.
    pub fn reason(&self) -> &str {
        match self {
            Self::BackendUnavailable(r)
            | Self::InvalidKey(r)
            | Self::DirectoryCreation(r)
            | Self::FileWrite(r)
            | Self::FileRead(r)
            | Self::NotFound(r)
            | Self::InvalidConfig(r)
            | Self::Cancelled(r)
            | Self::TimedOut(r) => r,
        }
    }
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use folio_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::InvalidKey("".to_string()));
/// assert!(format!("{}", err).contains("Invalid key"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorageErrorKind {
        &self.kind
    }
}
