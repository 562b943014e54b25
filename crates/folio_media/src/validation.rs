//! Upload admission rules and content-type resolution.

use crate::MediaConfig;
use derive_getters::Getters;
use folio_error::{FolioResult, MediaError, MediaErrorKind};
use std::collections::BTreeSet;

/// Extensions the thumbnail deriver is attempted for.
const RASTER_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// What an upload must satisfy before anything is written.
///
/// # Example
///
/// ```
/// use folio_media::UploadPolicyBuilder;
///
/// let policy = UploadPolicyBuilder::default()
///     .max_upload_bytes(1024u64)
///     .build()
///     .unwrap();
/// assert_eq!(policy.validate("scan.PNG", 512).unwrap(), "png");
/// assert!(policy.validate("scan.png", 4096).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct UploadPolicy {
    /// Lowercased extensions accepted for upload
    #[builder(default = "default_extensions()")]
    allowed_extensions: BTreeSet<String>,

    /// Largest accepted payload
    #[builder(default = "crate::config::DEFAULT_MAX_UPLOAD_BYTES")]
    max_upload_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: default_extensions(),
            max_upload_bytes: crate::config::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl From<&MediaConfig> for UploadPolicy {
    fn from(config: &MediaConfig) -> Self {
        Self {
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl UploadPolicy {
    /// Check `filename` and payload size, returning the lowercased extension.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUpload` when the name is empty, has no extension, has
    /// an extension outside the allowed set, or the payload is too large.
    #[track_caller]
    pub fn validate(&self, filename: &str, size_bytes: u64) -> FolioResult<String> {
        let reject = |reason: String| MediaError::new(MediaErrorKind::InvalidUpload(reason));

        let name = base_name(filename);
        if name.is_empty() {
            return Err(reject("No file selected".to_string()).into());
        }
        let extension = extension_of(name)
            .ok_or_else(|| reject(format!("{:?} has no file extension", name)))?;
        if !self.allowed_extensions.contains(&extension) {
            return Err(reject(format!("File type .{} is not allowed", extension)).into());
        }
        if size_bytes > self.max_upload_bytes {
            return Err(reject(format!(
                "Upload is {} bytes; the limit is {}",
                size_bytes, self.max_upload_bytes
            ))
            .into());
        }
        Ok(extension)
    }
}

/// Final path component of a client-supplied file name.
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
}

/// Lowercased text after the last dot of `filename`, if it is non-empty.
///
/// The stem may be empty: `.txt` has the extension `txt`.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, extension) = base_name(filename).rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// MIME type recorded for an original with `extension`.
///
/// Well-known extensions map to fixed types; anything else uses the caller's
/// hint, or `application/<ext>` without one.
pub fn resolve_content_type(extension: &str, hint: Option<&str>) -> String {
    match extension {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        "gif" => "image/gif".to_string(),
        "pdf" => "application/pdf".to_string(),
        _ => match hint.map(str::trim).filter(|h| !h.is_empty()) {
            Some(hint) => hint.to_string(),
            None => format!("application/{}", extension),
        },
    }
}

/// Whether thumbnails are derived for originals with `extension`.
pub fn is_raster(extension: &str) -> bool {
    RASTER_EXTENSIONS.contains(&extension)
}

fn default_extensions() -> BTreeSet<String> {
    crate::config::default_allowed_extensions()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("C:\\photos\\cat.jpeg").as_deref(), Some("jpeg"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".txt").as_deref(), Some("txt"));
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_resolve_content_type() {
        assert_eq!(resolve_content_type("jpg", Some("text/plain")), "image/jpeg");
        assert_eq!(resolve_content_type("png", None), "image/png");
        assert_eq!(resolve_content_type("gif", Some("application/octet-stream")), "image/gif");
        assert_eq!(resolve_content_type("pdf", None), "application/pdf");
        assert_eq!(resolve_content_type("txt", Some("text/plain")), "text/plain");
        assert_eq!(resolve_content_type("docx", None), "application/docx");
        assert_eq!(resolve_content_type("doc", Some("  ")), "application/doc");
    }

    #[test]
    fn test_is_raster() {
        assert!(is_raster("gif"));
        assert!(is_raster("jpeg"));
        assert!(!is_raster("pdf"));
        assert!(!is_raster("txt"));
    }

    #[test]
    fn test_validate_rejects() {
        let policy = UploadPolicy::default();
        assert!(policy.validate("", 1).is_err());
        assert!(policy.validate("uploads/", 1).is_err());
        assert!(policy.validate("script.exe", 1).is_err());
        assert!(policy.validate("notes", 1).is_err());
        assert!(policy.validate("huge.txt", 16 * 1024 * 1024 + 1).is_err());
    }

    #[test]
    fn test_validate_accepts() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.validate("Photo.JPG", 10).unwrap(), "jpg");
        assert_eq!(policy.validate("memo.docx", 16 * 1024 * 1024).unwrap(), "docx");
        assert_eq!(policy.validate(".txt", 3).unwrap(), "txt");
    }
}
