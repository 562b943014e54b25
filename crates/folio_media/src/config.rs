//! Layered Folio configuration.
//!
//! Sources, lowest to highest precedence:
//! - Bundled defaults (include_str! from folio.toml)
//! - `~/.config/folio/folio.toml`
//! - `./folio.toml`, or an explicit path
//! - `FOLIO__SECTION__KEY` environment variables
//! - Legacy deployment variables (`USE_S3`, `S3_BUCKET_NAME`, `AWS_REGION`,
//!   `UPLOAD_FOLDER`, `MAX_CONTENT_LENGTH`)

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use folio_error::{ConfigError, FolioError, FolioResult};
use folio_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default upload ceiling (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Default lifetime of issued links.
pub const DEFAULT_LINK_TTL_SECS: u64 = 3600;

/// Upload admission and link settings.
///
/// ```toml
/// [media]
/// max_upload_bytes = 16_777_216
/// allowed_extensions = ["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx"]
/// link_ttl_secs = 3600
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// File extensions accepted for upload
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Lifetime of links handed out by default
    #[serde(default = "default_link_ttl_secs")]
    pub link_ttl_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
            link_ttl_secs: default_link_ttl_secs(),
        }
    }
}

impl MediaConfig {
    /// Default link lifetime as a duration.
    pub fn link_ttl(&self) -> Duration {
        Duration::from_secs(self.link_ttl_secs)
    }
}

/// Complete process configuration.
///
/// Loaded once at startup and passed by value to whatever needs it.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    /// Backend intent and backend settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Upload and link settings
    #[serde(default)]
    pub media: MediaConfig,
}

impl FolioConfig {
    /// Load configuration from every layer, reading the process environment.
    ///
    /// When `path` is given it replaces `./folio.toml` and must exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use folio_media::FolioConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = FolioConfig::load(None)?;
    /// println!("prefer remote: {}", config.storage.prefer_remote);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(path: Option<&Path>) -> FolioResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Load configuration with an explicit environment.
    ///
    /// `env` stands in for the process environment when given; both the
    /// `FOLIO__` variables and the legacy names are read from it.
    #[instrument(skip(env))]
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> FolioResult<Self> {
        debug!("Loading configuration: env > file > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../folio.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/folio/folio.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("folio").required(false)),
        };

        let lookup = |name: &str| match &env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        };

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("media.allowed_extensions")
                .source(env.clone()),
        );

        builder = apply_legacy_env(builder, lookup).map_err(config_error)?;

        let config: Self = builder
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        debug!(
            prefer_remote = config.storage.prefer_remote,
            local_root = %config.storage.local.root.display(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Map the pre-existing deployment variables onto their config keys.
fn apply_legacy_env(
    builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    let use_s3 = lookup("USE_S3").map(|v| v.trim().eq_ignore_ascii_case("true"));
    let max_bytes = lookup("MAX_CONTENT_LENGTH").and_then(|v| v.trim().parse::<u64>().ok());
    let upload_folder = lookup("UPLOAD_FOLDER");
    // Deployments using UPLOAD_FOLDER keep originals directly in that folder
    let layout = upload_folder.as_ref().map(|_| "flat");

    builder
        .set_override_option("storage.prefer_remote", use_s3)?
        .set_override_option("storage.remote.bucket", lookup("S3_BUCKET_NAME"))?
        .set_override_option("storage.remote.region", lookup("AWS_REGION"))?
        .set_override_option("storage.local.root", upload_folder)?
        .set_override_option("storage.local.layout", layout)?
        .set_override_option("media.max_upload_bytes", max_bytes)
}

fn config_error(e: config::ConfigError) -> FolioError {
    FolioError::from(ConfigError::new(format!(
        "Failed to load configuration: {}",
        e
    )))
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

pub(crate) fn default_allowed_extensions() -> Vec<String> {
    ["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_link_ttl_secs() -> u64 {
    DEFAULT_LINK_TTL_SECS
}
