//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("API base URL is not set (use [api].base_url, ${env} or --api-url)", env = super::API_URL_ENV)]
    MissingApiUrl,

    #[error("Config validation error: {0}")]
    Validation(String),
}
