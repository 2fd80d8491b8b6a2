//! Configuration loading.
//!
//! Provider selection and credentials come from the environment
//! (`API_PROVIDER`, `OPENROUTER_API_KEY`, `GEMINI_API_KEY`,
//! `OPENROUTER_MODEL`). Everything else has defaults that an optional
//! `quizgen.toml` can override.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use quizgen_core::prompt::DEFAULT_QUESTION_COUNT;

use crate::error::ConfigError;
use crate::openrouter::DEFAULT_TIMEOUT_SECS;

pub const ENV_PROVIDER: &str = "API_PROVIDER";
pub const ENV_OPENROUTER_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_GEMINI_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "OPENROUTER_MODEL";

const CONFIG_FILE: &str = "quizgen.toml";

/// Which backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    Gemini,
}

impl ProviderKind {
    /// Environment variable holding this provider's API key.
    pub fn key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => ENV_OPENROUTER_KEY,
            ProviderKind::Gemini => ENV_GEMINI_KEY,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenRouter => write!(f, "openrouter"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Resolved configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    OpenRouter {
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    },
    Gemini {
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    },
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::OpenRouter { .. } => ProviderKind::OpenRouter,
            ProviderConfig::Gemini { .. } => ProviderKind::Gemini,
        }
    }

    pub fn model(&self) -> Option<&str> {
        match self {
            ProviderConfig::OpenRouter { model, .. } | ProviderConfig::Gemini { model, .. } => {
                model.as_deref()
            }
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, model, base_url) = match self {
            ProviderConfig::OpenRouter {
                model, base_url, ..
            } => ("OpenRouter", model, base_url),
            ProviderConfig::Gemini {
                model, base_url, ..
            } => ("Gemini", model, base_url),
        };
        f.debug_struct(name)
            .field("api_key", &"***")
            .field("model", model)
            .field("base_url", base_url)
            .finish()
    }
}

/// Top-level quizgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgenConfig {
    /// SQLite database holding the current question set.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Questions requested per generation.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Provider request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Override for the OpenRouter API base URL.
    #[serde(default)]
    pub openrouter_base_url: Option<String>,
    /// Override for the Gemini API base URL.
    #[serde(default)]
    pub gemini_base_url: Option<String>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("english_quiz.db")
}
fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for QuizgenConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            question_count: default_question_count(),
            timeout_secs: default_timeout(),
            openrouter_base_url: None,
            gemini_base_url: None,
        }
    }
}

impl QuizgenConfig {
    /// Resolve the provider from the process environment.
    pub fn provider_from_env(&self) -> Result<ProviderConfig, ConfigError> {
        self.provider_from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the provider through `lookup`, which maps an environment
    /// variable name to its value.
    pub fn provider_from_lookup<F>(&self, lookup: F) -> Result<ProviderConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let kind = match present(ENV_PROVIDER) {
            Some(value) => value.parse::<ProviderKind>()?,
            None => ProviderKind::OpenRouter,
        };
        let api_key = present(kind.key_var()).ok_or(ConfigError::MissingApiKey {
            provider: kind,
            var: kind.key_var(),
        })?;
        let model = present(ENV_MODEL).map(|m| m.trim().to_string());

        let config = match kind {
            ProviderKind::OpenRouter => ProviderConfig::OpenRouter {
                api_key: api_key.trim().to_string(),
                model,
                base_url: self.openrouter_base_url.clone(),
            },
            ProviderKind::Gemini => ProviderConfig::Gemini {
                api_key: api_key.trim().to_string(),
                model,
                base_url: self.gemini_base_url.clone(),
            },
        };
        tracing::debug!(?config, "resolved provider configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.question_count == 0 {
            return Err(ConfigError::Invalid("question_count must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

/// Load config from an explicit path, or from `quizgen.toml` in the current
/// directory, falling back to defaults when neither exists.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgenConfig, ConfigError> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            local.exists().then_some(local)
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            toml::from_str::<QuizgenConfig>(&content)
                .map_err(|source| ConfigError::Parse { path, source })?
        }
        None => QuizgenConfig::default(),
    };

    config.validate()?;
    Ok(config)
}
