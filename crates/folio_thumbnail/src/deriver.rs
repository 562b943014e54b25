//! Thumbnail derivation.

use crate::ThumbnailSize;
use derive_getters::Getters;
use folio_error::{FolioResult, ThumbnailError, ThumbnailErrorKind};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader, ImageResult};
use std::collections::BTreeMap;
use std::io::Cursor;
use strum::IntoEnumIterator;

/// JPEG quality used for every JPEG thumbnail.
pub const JPEG_QUALITY: u8 = 85;

/// Encoding chosen for a set of thumbnails.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG at [`JPEG_QUALITY`]
    #[display("jpeg")]
    Jpeg,
    /// Lossless PNG at maximum compression
    #[display("png")]
    Png,
}

impl OutputFormat {
    /// JPEG sources stay JPEG; everything else is re-encoded losslessly.
    pub fn for_source(format: Option<ImageFormat>) -> Self {
        match format {
            Some(ImageFormat::Jpeg) => OutputFormat::Jpeg,
            _ => OutputFormat::Png,
        }
    }

    /// MIME type of the encoded thumbnails.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// One encoded thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Thumbnail {
    /// Size class
    size: ThumbnailSize,
    /// Output width in pixels
    width: u32,
    /// Output height in pixels
    height: u32,
    /// Encoding of `data`
    format: OutputFormat,
    /// Encoded image bytes
    data: Vec<u8>,
}

impl Thumbnail {
    /// Take the encoded bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Every thumbnail derived from one source image.
///
/// Sizes that failed to encode are absent from `thumbnails` and listed in
/// `failures`; an empty or partial set is a valid outcome.
#[derive(Debug, Clone, Getters)]
pub struct DerivedThumbnails {
    /// Decoded source width
    source_width: u32,
    /// Decoded source height
    source_height: u32,
    /// Encoding used for all thumbnails
    format: OutputFormat,
    /// Successfully encoded thumbnails by size
    thumbnails: BTreeMap<ThumbnailSize, Thumbnail>,
    /// Per-size encode failures
    failures: Vec<ThumbnailError>,
}

impl DerivedThumbnails {
    /// Take the thumbnail mapping.
    pub fn into_thumbnails(self) -> BTreeMap<ThumbnailSize, Thumbnail> {
        self.thumbnails
    }
}

/// Produces the fixed set of resized variants from raw image bytes.
///
/// Pure and CPU-bound: no I/O, no knowledge of where results are stored.
#[derive(Debug, Clone)]
pub struct ThumbnailDeriver {
    filter: FilterType,
}

impl Default for ThumbnailDeriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailDeriver {
    /// Deriver for every [`ThumbnailSize`] with Lanczos3 resampling.
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Derive every thumbnail size from `data`.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedFormat` only when `data` cannot be decoded as a
    /// raster image. Encoding failures for individual sizes are reported in
    /// [`DerivedThumbnails::failures`] instead.
    #[tracing::instrument(skip_all, fields(input_bytes = data.len()))]
    pub fn derive(&self, data: &[u8]) -> FolioResult<DerivedThumbnails> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| {
                ThumbnailError::new(ThumbnailErrorKind::UnsupportedFormat(e.to_string()))
            })?;
        let format = OutputFormat::for_source(reader.format());
        let decoded = reader.decode().map_err(|e| {
            ThumbnailError::new(ThumbnailErrorKind::UnsupportedFormat(e.to_string()))
        })?;

        let (source_width, source_height) = (decoded.width(), decoded.height());
        let source = flatten(decoded);

        let mut thumbnails = BTreeMap::new();
        let mut failures = Vec::new();

        for spec in ThumbnailSize::iter().map(|size| size.spec()) {
            let (width, height) = spec.fit(source_width, source_height);
            let resized = if (width, height) == (source_width, source_height) {
                source.clone()
            } else {
                source.resize_exact(width, height, self.filter)
            };

            match encode(&resized, format) {
                Ok(data) => {
                    tracing::debug!(
                        size = %spec.size,
                        width,
                        height,
                        bytes = data.len(),
                        "Encoded thumbnail"
                    );
                    thumbnails.insert(
                        spec.size,
                        Thumbnail {
                            size: spec.size,
                            width,
                            height,
                            format,
                            data,
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(size = %spec.size, error = %e, "Thumbnail encoding failed");
                    failures.push(ThumbnailError::new(ThumbnailErrorKind::Encode {
                        size: spec.size.to_string(),
                        reason: e.to_string(),
                    }));
                }
            }
        }

        tracing::info!(
            source_width,
            source_height,
            format = %format,
            derived = thumbnails.len(),
            "Derived thumbnails"
        );

        Ok(DerivedThumbnails {
            source_width,
            source_height,
            format,
            thumbnails,
            failures,
        })
    }
}

/// Reduce to opaque 8-bit color.
///
/// Alpha is dropped, not composited onto a background, so transparent pixels
/// take whatever color they carried.
fn flatten(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => image,
        ColorType::L16 => DynamicImage::ImageLuma8(image.to_luma8()),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

fn encode(image: &DynamicImage, format: OutputFormat) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))?
        }
        OutputFormat::Png => image.write_with_encoder(PngEncoder::new_with_quality(
            &mut buf,
            CompressionType::Best,
            PngFilter::Adaptive,
        ))?,
    }
    Ok(buf)
}
