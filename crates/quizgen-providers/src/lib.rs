//! quizgen-providers: LLM provider integrations.
//!
//! Implements the `QuizProvider` trait for OpenRouter and Gemini, and
//! resolves which one to use from the environment at startup.

pub mod config;
pub mod error;
pub mod gemini;
mod http;
pub mod mock;
pub mod openrouter;
pub mod provider;

pub use config::{load_config_from, ProviderConfig, ProviderKind, QuizgenConfig};
pub use error::{ConfigError, ProviderError};
pub use provider::{create_provider, Provider};
