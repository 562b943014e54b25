//! Upload and deletion orchestration for Folio.
//!
//! This crate ties the storage port to the thumbnail deriver:
//!
//! - [`UploadOrchestrator`] stores an original under a fresh unique key, then
//!   derives and stores thumbnails for raster images on a best-effort basis
//! - [`DeletionOrchestrator`] removes an original and its thumbnails,
//!   attempting every object and reporting each failure
//! - [`FolioConfig`] loads the layered process configuration
//!
//! # Key layout
//!
//! | Object | Key |
//! |---|---|
//! | original | `uploads/<token>.<ext>` |
//! | thumbnail | `thumbnails/thumb_<size>_<token>.<ext>` |
//!
//! # Example
//!
//! ```rust,no_run
//! use folio_media::{DeletionOrchestrator, UploadOrchestrator, UploadPolicy};
//! use folio_storage::LocalStorage;
//!
//! # async fn example(bytes: bytes::Bytes) -> Result<(), Box<dyn std::error::Error>> {
//! let storage = LocalStorage::new("media")?;
//! let uploads = UploadOrchestrator::new(storage.clone(), UploadPolicy::default());
//!
//! let report = uploads
//!     .upload_with_thumbnails(bytes, "diagram.png", Some("image/png"))
//!     .await?;
//! println!("original at {}", report.original_reference());
//!
//! let deletions = DeletionOrchestrator::new(storage);
//! let outcome = deletions
//!     .delete_with_thumbnails(report.original().key(), &report.thumbnail_keys())
//!     .await;
//! assert!(outcome.is_complete());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod delete;
mod naming;
mod upload;
mod validation;

pub use config::{DEFAULT_LINK_TTL_SECS, DEFAULT_MAX_UPLOAD_BYTES, FolioConfig, MediaConfig};
pub use delete::{DeletionFailure, DeletionOrchestrator, DeletionReport};
pub use naming::UniqueName;
pub use upload::{UploadIssue, UploadOrchestrator, UploadReport};
pub use validation::{
    UploadPolicy, UploadPolicyBuilder, UploadPolicyBuilderError, extension_of, is_raster,
    resolve_content_type,
};
