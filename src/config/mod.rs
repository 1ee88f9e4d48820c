//! Configuration management for `sitedata.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[api]`      | Remote content API location                      |
//! | `[snapshot]` | Where snapshots are written and read back from   |
//! | `[build]`    | Values stamped into `build-info.json`            |
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "https://cms.example.org/api"
//!
//! [snapshot]
//! dir = "public/data"
//!
//! [build]
//! version = "2.4.0"
//! ```
//!
//! # Precedence
//!
//! CLI flags > `API_BASE_URL` environment variable > config file > defaults.
//! The config file itself is optional.

pub mod defaults;
mod error;

pub use error::ConfigError;

use crate::cli::Cli;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable holding the remote API base URL.
pub const API_URL_ENV: &str = "API_BASE_URL";

// ============================================================================
// Sections
// ============================================================================

/// `[api]` section - the remote content API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    /// Required for snapshot generation and live fallback.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// `[snapshot]` section - snapshot file location.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Directory the generator writes to and the accessor reads from.
    /// `~` is expanded.
    #[serde(default = "defaults::snapshot::dir")]
    #[educe(Default = defaults::snapshot::dir())]
    pub dir: PathBuf,

    /// When set, snapshots are fetched as static files from this URL
    /// instead of being read from `dir`.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// `[build]` section - build metadata.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Version string written to `build-info.json`.
    #[serde(default = "defaults::build::version")]
    #[educe(Default = defaults::build::version())]
    pub version: String,
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing sitedata.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteDataConfig {
    /// Path of the config file it was loaded from (if any)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

impl SiteDataConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api.base_url = Some(url);
        }
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api.base_url = Some(url.clone());
        }
        Self::update_option(&mut self.snapshot.dir, cli.data.as_ref());
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate URL fields and the snapshot directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snapshot.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("[snapshot].dir must not be empty".into()));
        }
        let urls = [
            ("[api].base_url", &self.api.base_url),
            ("[snapshot].base_url", &self.snapshot.base_url),
        ];
        for (field, url) in urls {
            if let Some(url) = url
                && !(url.starts_with("http://") || url.starts_with("https://"))
            {
                return Err(ConfigError::Validation(format!(
                    "{field} must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }

    /// The API base URL, required by the generator and the live client.
    pub fn api_url(&self) -> Result<&str, ConfigError> {
        self.api
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingApiUrl)
    }

    /// Snapshot directory with `~` expanded.
    pub fn snapshot_dir(&self) -> PathBuf {
        let dir = self.snapshot.dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&dir).into_owned())
    }
}
