//! Core trait definitions for LLM providers and question stores.
//!
//! These are implemented by the `quizgen-providers` and `quizgen-store`
//! crates respectively.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, StoreError};
use crate::model::QuestionSet;

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// An LLM backend that turns a prompt into raw text.
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openrouter").
    fn name(&self) -> &str;

    /// Model used when a request does not name one.
    fn default_model(&self) -> &str;

    /// Send a single generation request. No retries are attempted.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError>;
}

/// Request to generate text from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The main prompt.
    pub prompt: String,
    /// Model identifier; the provider default is used when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            system_prompt: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Raw, unparsed response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The response text.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Question store trait
// ---------------------------------------------------------------------------

/// Persistent storage holding exactly one question set at a time.
pub trait QuestionStore: Send {
    /// Swap the stored set for `questions`. Either the new set becomes fully
    /// visible or the old set remains intact.
    fn replace(&mut self, questions: &QuestionSet) -> Result<(), StoreError>;

    /// Load the stored set in insertion order, or `None` if nothing is stored.
    fn load_all(&self) -> Result<Option<QuestionSet>, StoreError>;
}
