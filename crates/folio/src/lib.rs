//! Folio: media storage with automatic thumbnails.
//!
//! Folio stores uploaded files in either a local directory tree or an
//! S3-compatible bucket, chosen once at startup, and derives small, medium
//! and large thumbnails for raster images.
//!
//! # Features
//!
//! - **Two interchangeable backends**: Local filesystem and remote object store
//!   behind one [`MediaStorage`] contract
//! - **One-way fallback**: A preferred remote backend that fails its startup
//!   check is replaced by local storage for the rest of the process
//! - **Best-effort thumbnails**: Originals are all-or-nothing; thumbnails
//!   never hold an upload hostage
//! - **Best-effort deletion**: Every object in a derived set is attempted
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use folio::{CancellationToken, Folio, FolioConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FolioConfig::load(None)?;
//!     let folio = Folio::start(config, CancellationToken::new()).await?;
//!
//!     let report = folio
//!         .uploads()
//!         .upload_with_thumbnails("hello".into(), "hello.txt", Some("text/plain"))
//!         .await?;
//!     println!("stored at {}", report.original_reference());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Folio is organized as a workspace with focused crates:
//!
//! - `folio_error` - Error types
//! - `folio_storage` - Storage port, local and remote backends, backend selection
//! - `folio_thumbnail` - Thumbnail derivation
//! - `folio_media` - Upload and deletion orchestration, configuration
//!
//! This crate (`folio`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;

pub use app::Folio;

pub use folio_error::*;
pub use folio_media::*;
pub use folio_storage::*;
pub use folio_thumbnail::*;
