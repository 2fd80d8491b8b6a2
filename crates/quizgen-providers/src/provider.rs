//! The closed set of supported backends.

use async_trait::async_trait;

use quizgen_core::traits::{GenerateRequest, GenerateResponse, QuizProvider};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::gemini::GeminiProvider;
use crate::openrouter::OpenRouterProvider;

/// A configured LLM backend, chosen once at startup.
pub enum Provider {
    OpenRouter(OpenRouterProvider),
    Gemini(GeminiProvider),
}

impl Provider {
    fn inner(&self) -> &dyn QuizProvider {
        match self {
            Provider::OpenRouter(p) => p,
            Provider::Gemini(p) => p,
        }
    }
}

#[async_trait]
impl QuizProvider for Provider {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.inner().generate(request).await
    }
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig, timeout_secs: u64) -> Result<Provider, ProviderError> {
    match config {
        ProviderConfig::OpenRouter {
            api_key,
            model,
            base_url,
        } => Ok(Provider::OpenRouter(OpenRouterProvider::new(
            api_key,
            model.clone(),
            base_url.clone(),
            timeout_secs,
        )?)),
        ProviderConfig::Gemini {
            api_key,
            model,
            base_url,
        } => Ok(Provider::Gemini(GeminiProvider::new(
            api_key,
            model.clone(),
            base_url.clone(),
            timeout_secs,
        )?)),
    }
}
