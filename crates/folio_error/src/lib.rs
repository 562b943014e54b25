//! Error types for the Folio library.
//!
//! This crate provides the error taxonomy shared by every Folio crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Callers are expected to branch on the kind and read its reason string,
//! never on backend-specific error details.
//!
//! # Examples
//!
//! ```
//! use folio_error::{FolioResult, StorageError, StorageErrorKind};
//!
//! fn store() -> FolioResult<String> {
//!     Err(StorageError::new(StorageErrorKind::BackendUnavailable(
//!         "bucket unreachable".to_string(),
//!     )))?
//! }
//!
//! match store() {
//!     Ok(reference) => println!("Stored at {}", reference),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod media;
mod storage;
mod thumbnail;

pub use config::ConfigError;
pub use error::{FolioError, FolioErrorKind, FolioResult};
pub use media::{MediaError, MediaErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use thumbnail::{ThumbnailError, ThumbnailErrorKind};
