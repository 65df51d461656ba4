//! Brain module: text-generation provider abstraction.
//!
//! Defines the `LlmProvider` trait the summarizer and insight synthesizer
//! prompt through, plus a scriptable `MockLlmProvider` for tests and offline
//! runs.

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse, TokenUsage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Trait for text-generation providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform a full completion and return the response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Return the model name.
    fn model_name(&self) -> &str;

    /// Convenience wrapper returning only non-empty completion text.
    async fn complete_text(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let response = self.complete(request).await?;
        if response.text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(response.text)
    }
}

/// A mock LLM provider that replays queued responses.
///
/// When the queue is empty it either returns a fixed placeholder text or,
/// if constructed with [`MockLlmProvider::failing`], an `ApiRequest` error.
pub struct MockLlmProvider {
    model: String,
    responses: Mutex<VecDeque<Result<String, String>>>,
    fail_when_empty: bool,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Mutex::new(VecDeque::new()),
            fail_when_empty: false,
        }
    }

    /// Create a MockLlmProvider that always returns the given text.
    ///
    /// Queues multiple copies of the response so it can handle multiple calls.
    pub fn with_response(text: &str) -> Self {
        let provider = Self::new();
        for _ in 0..20 {
            provider.queue_response(text);
        }
        provider
    }

    /// Create a provider whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail_when_empty: true,
            ..Self::new()
        }
    }

    /// Queue a text response for the next `complete` call.
    pub fn queue_response(&self, text: &str) {
        self.lock().push_back(Ok(text.to_string()));
    }

    /// Queue an error for the next `complete` call.
    pub fn queue_error(&self, message: &str) {
        self.lock().push_back(Err(message.to_string()));
    }

    /// Number of queued responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock().len()
    }

    /// Create a simple text response for testing.
    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            text: text.to_string(),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
            finish_reason: Some("stop".to_string()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        // A poisoned queue only means another test thread panicked mid-push.
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let next = self.lock().pop_front();
        match next {
            Some(Ok(text)) => Ok(Self::text_response(&text)),
            Some(Err(message)) => Err(LlmError::ApiRequest { message }),
            None if self.fail_when_empty => Err(LlmError::ApiRequest {
                message: "mock provider configured to fail".to_string(),
            }),
            None => Ok(Self::text_response(
                "I'm a mock LLM. No queued responses available.",
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_queue_in_order() {
        let provider = MockLlmProvider::new();
        provider.queue_response("first");
        provider.queue_response("second");

        let a = provider.complete(CompletionRequest::default()).await.unwrap();
        let b = provider.complete(CompletionRequest::default()).await.unwrap();
        assert_eq!(a.text, "first");
        assert_eq!(b.text, "second");
        assert_eq!(provider.remaining(), 0);
    }

    #[tokio::test]
    async fn test_mock_queued_error() {
        let provider = MockLlmProvider::new();
        provider.queue_error("boom");
        let err = provider
            .complete(CompletionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ApiRequest { ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let provider = MockLlmProvider::failing();
        assert!(provider.complete(CompletionRequest::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_complete_text_rejects_blank() {
        let provider = MockLlmProvider::new();
        provider.queue_response("   ");
        let err = provider
            .complete_text(CompletionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[test]
    fn test_mock_model_name() {
        assert_eq!(MockLlmProvider::new().model_name(), "mock-model");
    }
}
