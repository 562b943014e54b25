//! Storage keys and namespaces.

use folio_error::{FolioResult, StorageError, StorageErrorKind};
use strum::IntoEnumIterator;

/// Longest key accepted by either backend (the S3 object key limit).
const MAX_KEY_LEN: usize = 1024;

/// Top-level namespace an object lives under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum Namespace {
    /// Original uploads
    #[display("uploads")]
    Uploads,
    /// Derived thumbnail variants
    #[display("thumbnails")]
    Thumbnails,
}

impl Namespace {
    /// Key prefix for this namespace, without the trailing slash.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Uploads => "uploads",
            Namespace::Thumbnails => "thumbnails",
        }
    }
}

/// A validated, path-like object key such as `uploads/<token>.png`.
///
/// Keys are relative, `/`-separated, and never contain empty, `.` or `..`
/// segments, so every backend can map them onto its own namespace without
/// escaping it.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    serde::Serialize,
)]
#[display("{}", _0)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Parse and validate a raw key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` for empty, absolute, or otherwise malformed keys.
    #[track_caller]
    pub fn parse(key: impl Into<String>) -> FolioResult<Self> {
        let key = key.into();
        if let Some(reason) = Self::problem(&key) {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(format!(
                "{:?}: {}",
                key, reason
            )))
            .into());
        }
        Ok(Self(key))
    }

    /// Build `<namespace>/<name>` from a bare object name.
    #[track_caller]
    pub fn in_namespace(namespace: Namespace, name: &str) -> FolioResult<Self> {
        Self::parse(format!("{}/{}", namespace.as_str(), name))
    }

    /// Recover a key from a previously issued reference.
    ///
    /// References may be full URLs, local paths, or bare file names. Only the
    /// last path segment is kept and re-rooted under `namespace`; query strings
    /// and fragments (as found on signed links) are dropped.
    #[track_caller]
    pub fn from_reference(reference: &str, namespace: Namespace) -> FolioResult<Self> {
        let trimmed = reference
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or_default();
        Self::in_namespace(namespace, name)
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment of the key.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Namespace of the key, if it lives under a known one.
    pub fn namespace(&self) -> Option<Namespace> {
        let head = self.0.split('/').next()?;
        Namespace::iter().find(|ns| ns.as_str() == head && self.0.len() > head.len())
    }

    /// Path segments of the key.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    fn problem(key: &str) -> Option<&'static str> {
        if key.is_empty() {
            return Some("key is empty");
        }
        if key.len() > MAX_KEY_LEN {
            return Some("key exceeds 1024 bytes");
        }
        if key.starts_with('/') {
            return Some("key must be relative");
        }
        if key.contains('\\') {
            return Some("key must use '/' separators");
        }
        if key.chars().any(char::is_control) {
            return Some("key contains control characters");
        }
        if key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Some("key contains an empty or relative segment");
        }
        None
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for StorageKey {
    type Err = folio_error::FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_namespaced_keys() {
        assert!(StorageKey::parse("uploads/abc.png").is_ok());
        assert!(StorageKey::parse("thumbnails/thumb_small_abc.png").is_ok());
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for bad in [
            "",
            "/uploads/a.png",
            "uploads//a.png",
            "uploads/../a",
            "uploads/",
            "a\\b",
            "a\nb",
        ] {
            let err = StorageKey::parse(bad).unwrap_err();
            assert!(
                matches!(err.storage_kind(), Some(StorageErrorKind::InvalidKey(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_reference_strips_url_parts() {
        let key = StorageKey::from_reference(
            "https://bucket.s3.us-east-1.amazonaws.com/thumbnails/thumb_small_x.png?X-Amz-Expires=60",
            Namespace::Thumbnails,
        )
        .unwrap();
        assert_eq!(key.as_str(), "thumbnails/thumb_small_x.png");

        let bare = StorageKey::from_reference("thumb_large_x.png", Namespace::Thumbnails).unwrap();
        assert_eq!(bare.as_str(), "thumbnails/thumb_large_x.png");
    }

    #[test]
    fn test_namespace_and_file_name() {
        let key = StorageKey::parse("uploads/abc.pdf").unwrap();
        assert_eq!(key.namespace(), Some(Namespace::Uploads));
        assert_eq!(key.file_name(), "abc.pdf");

        let other = StorageKey::parse("misc/abc.pdf").unwrap();
        assert_eq!(other.namespace(), None);
    }
}
