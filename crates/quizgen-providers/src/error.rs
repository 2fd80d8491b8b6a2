//! Provider and configuration error types.

use std::path::PathBuf;

use thiserror::Error;

pub use quizgen_core::error::ProviderError;

use crate::config::ProviderKind;

/// Errors raised while resolving configuration at startup, before any
/// generation is attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `API_PROVIDER` names a backend we do not support.
    #[error("invalid API_PROVIDER '{0}', use 'openrouter' or 'gemini'")]
    UnknownProvider(String),

    /// The API key for the selected provider is missing or blank.
    #[error("API_PROVIDER is '{provider}' but {var} is not set")]
    MissingApiKey {
        provider: ProviderKind,
        var: &'static str,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A config value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}
