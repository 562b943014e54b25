//! Storage configuration.
//!
//! These structures are deserialized from the `[storage]` table of
//! `folio.toml`. They are plain values: the backend choice made from them is
//! fixed once at startup by [`BackendSelector`](crate::BackendSelector).
//!
//! ```toml
//! [storage]
//! prefer_remote = true
//!
//! [storage.local]
//! root = "media"
//! layout = "namespaced"
//!
//! [storage.remote]
//! bucket = "notes-uploads"
//! region = "us-east-2"
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend selection intent plus settings for both backends.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Try the remote backend first, falling back to local if it is unreachable
    #[serde(default)]
    pub prefer_remote: bool,

    /// Local filesystem settings
    #[serde(default)]
    pub local: LocalConfig,

    /// Remote object store settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// How keys map onto paths below the local root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalLayout {
    /// Every key lives at `{root}/{key}`
    #[default]
    Namespaced,
    /// Originals live directly in `{root}`, thumbnails in `{root}/thumbnails`
    Flat,
}

/// Settings for the local filesystem backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalConfig {
    /// Directory all keys are stored below
    #[serde(default = "default_local_root")]
    pub root: PathBuf,

    /// Path layout below `root`
    #[serde(default)]
    pub layout: LocalLayout,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            root: default_local_root(),
            layout: LocalLayout::default(),
        }
    }
}

/// Settings for the remote object store backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Bucket name (required when `prefer_remote` is set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Bucket region
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint for S3-compatible services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Access key id (falls back to `AWS_ACCESS_KEY_ID`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    /// Secret access key (falls back to `AWS_SECRET_ACCESS_KEY`)
    #[serde(default, skip_serializing)]
    pub secret_access_key: Option<String>,

    /// Permit plain-HTTP endpoints
    #[serde(default)]
    pub allow_http: bool,

    /// Per-call deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Client-level retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            allow_http: false,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl RemoteConfig {
    /// Base of persistent object URLs for `bucket`.
    ///
    /// Virtual-hosted AWS style unless a custom endpoint is configured, in
    /// which case path style is used.
    pub fn public_base(&self, bucket: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            None => format!("https://{}.s3.{}.amazonaws.com", bucket, self.region),
        }
    }
}

fn default_local_root() -> PathBuf {
    PathBuf::from("media")
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> usize {
    3
}
