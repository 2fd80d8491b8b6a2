//! Mock provider for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizgen_core::traits::{GenerateRequest, GenerateResponse, QuizProvider};

use crate::error::ProviderError;

/// A mock LLM provider for exercising the quiz pipeline without real API
/// calls. Replies with a fixed body, or fails every call.
pub struct MockProvider {
    reply: Result<String, (u16, String)>,
    call_count: AtomicU32,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Create a mock that always returns the same response text.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            reply: Ok(response.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock whose every call fails with an API error.
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            reply: Err((status, message.to_string())),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuizProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        match &self.reply {
            Ok(content) => Ok(GenerateResponse {
                content: content.clone(),
                model: request
                    .model
                    .clone()
                    .unwrap_or_else(|| self.default_model().to_string()),
                latency_ms: 1,
            }),
            Err((status, message)) => Err(ProviderError::ApiError {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("[]");
        let request = GenerateRequest::new("anything");

        let response = provider.generate(&request).await.unwrap();
        assert_eq!(response.content, "[]");
        assert_eq!(response.model, "mock-model");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn failing_response() {
        let provider = MockProvider::failing(503, "overloaded");
        let err = provider
            .generate(&GenerateRequest::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { status: 503, .. }));
        assert_eq!(provider.call_count(), 1);
    }
}
