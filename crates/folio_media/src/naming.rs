//! Collision-free object naming.

use folio_error::FolioResult;
use folio_storage::{Namespace, StorageKey};
use folio_thumbnail::ThumbnailSize;
use uuid::Uuid;

/// Prefix shared by every thumbnail file name.
const THUMBNAIL_PREFIX: &str = "thumb_";

/// A random token plus the original file extension.
///
/// Every key in a derived set (the original and its thumbnails) is built
/// from one `UniqueName`, so they can be found again from the original key
/// alone. Tokens are random, so two uploads of identical bytes get two
/// independent names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueName {
    token: String,
    extension: String,
}

impl UniqueName {
    /// Fresh name for a file with `extension` (lowercased).
    pub fn generate(extension: &str) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            extension: extension.to_ascii_lowercase(),
        }
    }

    /// Recover the name an original key was built from.
    ///
    /// Returns `None` for keys outside `uploads/` or without an extension.
    pub fn from_original_key(key: &StorageKey) -> Option<Self> {
        if key.namespace() != Some(Namespace::Uploads) {
            return None;
        }
        let (token, extension) = key.file_name().rsplit_once('.')?;
        if token.is_empty() || extension.is_empty() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
            extension: extension.to_string(),
        })
    }

    /// Lowercased extension without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `<token>.<ext>`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.token, self.extension)
    }

    /// `uploads/<token>.<ext>`
    pub fn original_key(&self) -> FolioResult<StorageKey> {
        StorageKey::in_namespace(Namespace::Uploads, &self.file_name())
    }

    /// `thumbnails/thumb_<size>_<token>.<ext>`
    pub fn thumbnail_key(&self, size: ThumbnailSize) -> FolioResult<StorageKey> {
        StorageKey::in_namespace(
            Namespace::Thumbnails,
            &format!("{}{}_{}", THUMBNAIL_PREFIX, size.as_str(), self.file_name()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_formats() {
        let name = UniqueName {
            token: "6f1c2a9e-0000-4000-8000-000000000001".to_string(),
            extension: "jpg".to_string(),
        };
        assert_eq!(
            name.original_key().unwrap().as_str(),
            "uploads/6f1c2a9e-0000-4000-8000-000000000001.jpg"
        );
        assert_eq!(
            name.thumbnail_key(ThumbnailSize::Medium).unwrap().as_str(),
            "thumbnails/thumb_medium_6f1c2a9e-0000-4000-8000-000000000001.jpg"
        );
    }

    #[test]
    fn test_extension_lowercased() {
        let name = UniqueName::generate("PNG");
        assert_eq!(name.extension(), "png");
        assert!(name.original_key().unwrap().as_str().ends_with(".png"));
    }

    #[test]
    fn test_generated_names_are_unique() {
        let keys: HashSet<String> = (0..10_000)
            .map(|_| UniqueName::generate("txt").original_key().unwrap().to_string())
            .collect();
        assert_eq!(keys.len(), 10_000);
    }

    #[test]
    fn test_round_trip_from_original_key() {
        let name = UniqueName::generate("gif");
        let key = name.original_key().unwrap();
        assert_eq!(UniqueName::from_original_key(&key), Some(name));
    }

    #[test]
    fn test_from_original_key_rejects_other_namespaces() {
        let key = StorageKey::parse("thumbnails/thumb_small_abc.png").unwrap();
        assert_eq!(UniqueName::from_original_key(&key), None);
        let key = StorageKey::parse("uploads/no-extension").unwrap();
        assert_eq!(UniqueName::from_original_key(&key), None);
    }
}
