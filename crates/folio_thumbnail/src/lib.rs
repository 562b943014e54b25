//! Thumbnail derivation for Folio.
//!
//! Given raw image bytes, [`ThumbnailDeriver`] produces one resized raster
//! variant per [`ThumbnailSize`], independent of where the results will be
//! stored.
//!
//! | Size | Bounding box |
//! |---|---|
//! | small | 150×150 |
//! | medium | 300×300 |
//! | large | 600×600 |
//!
//! Each variant fits its box with the source aspect ratio preserved and is
//! never upscaled. JPEG sources are re-encoded as JPEG at quality 85; every
//! other source becomes a maximally compressed PNG.
//!
//! # Example
//!
//! ```rust,no_run
//! use folio_thumbnail::{ThumbnailDeriver, ThumbnailSize};
//!
//! # fn example(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let derived = ThumbnailDeriver::new().derive(bytes)?;
//! if let Some(small) = derived.thumbnails().get(&ThumbnailSize::Small) {
//!     println!("small: {}x{}", small.width(), small.height());
//! }
//! # Ok(())
//! # }
//! ```

mod deriver;
mod size;

pub use deriver::{DerivedThumbnails, JPEG_QUALITY, OutputFormat, Thumbnail, ThumbnailDeriver};
pub use size::{ThumbnailSize, ThumbnailSpec};
