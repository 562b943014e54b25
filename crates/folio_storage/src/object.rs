//! Stored object descriptors.

use crate::StorageKey;
use derive_getters::Getters;
use sha2::{Digest, Sha256};

/// Which storage substrate an object resides in.
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
    serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local filesystem directory tree
    #[display("local")]
    Local,
    /// Remote object store bucket
    #[display("remote")]
    Remote,
}

/// An immutable object persisted by a storage backend.
///
/// This is the success side of every `store` call: it carries the key the
/// object was written under and the public/access reference the backend
/// issued for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, serde::Serialize)]
pub struct StoredObject {
    /// Key within the backend namespace
    key: StorageKey,
    /// MIME type recorded with the object
    content_type: String,
    /// Size of the object in bytes
    size_bytes: u64,
    /// SHA-256 of the stored bytes (hex)
    content_hash: String,
    /// Backend the object resides in
    backend: BackendKind,
    /// Public or in-process reference to the object
    reference: String,
}

impl StoredObject {
    /// Describe `data` as stored under `key` by `backend`.
    pub fn new(
        key: StorageKey,
        content_type: impl Into<String>,
        data: &[u8],
        backend: BackendKind,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            key,
            content_type: content_type.into(),
            size_bytes: data.len() as u64,
            content_hash: compute_hash(data),
            backend,
            reference: reference.into(),
        }
    }
}

/// Compute SHA-256 hash of data.
pub fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
