//! BioGraph LLM Provider Layer
//!
//! Implementations of the [`LanguageModel`] trait from `biograph-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: scripted, deterministic responses for tests
//! - `OllamaProvider`: local Ollama API
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! Providers block the calling thread. The pipeline calls them from worker
//! threads, never from inside an async task.
//!
//! # Examples
//!
//! ```
//! use biograph_llm::MockProvider;
//! use biograph_domain::{CompletionOptions, LanguageModel};
//!
//! let provider = MockProvider::new("MATCH (d:Drug) RETURN d.name LIMIT 5");
//! let text = provider.complete("any prompt", &CompletionOptions::default()).unwrap();
//! assert!(text.starts_with("MATCH"));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ollama;
pub mod openai;

use biograph_domain::{CompletionOptions, LanguageModel, ModelError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use config::{LlmConfig, ProviderKind};
pub use ollama::OllamaProvider;
pub use openai::{OpenAiConfig, OpenAiProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request exceeded its deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Provider is misconfigured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<LlmError> for ModelError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Communication(msg) => ModelError::Unavailable(msg),
            LlmError::ModelNotAvailable(model) => {
                ModelError::Unavailable(format!("model '{}' is not available", model))
            }
            LlmError::Config(msg) => ModelError::Unavailable(msg),
            LlmError::Timeout(after) => ModelError::Timeout(after),
            LlmError::RateLimitExceeded => ModelError::RateLimited,
            LlmError::InvalidResponse(msg) => ModelError::InvalidResponse(msg),
            LlmError::Other(msg) => ModelError::Other(msg),
        }
    }
}

/// Exponential backoff delay before retry number `attempt` (1-based): 1s, 2s, 4s...
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt.saturating_sub(1)))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock LLM provider for deterministic testing
///
/// Returns scripted responses in order, then falls back to a default
/// response. No network calls are made. Every prompt is recorded so tests
/// can assert on what the pipeline sent.
///
/// # Examples
///
/// ```
/// use biograph_llm::{LlmError, MockProvider};
/// use biograph_domain::{CompletionOptions, LanguageModel};
///
/// let provider = MockProvider::default();
/// provider.push_response("first");
/// provider.push_error(LlmError::RateLimitExceeded);
///
/// let opts = CompletionOptions::default();
/// assert_eq!(provider.complete("a", &opts).unwrap(), "first");
/// assert!(provider.complete("b", &opts).is_err());
/// assert_eq!(provider.complete("c", &opts).unwrap(), "Default mock response");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a provider that plays back `responses` in order
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::default();
        for response in responses {
            provider.push_response(response);
        }
        provider
    }

    /// Queue a response for the next unanswered call
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.script).push_back(Ok(response.into()));
    }

    /// Queue an error for the next unanswered call
    pub fn push_error(&self, error: LlmError) {
        lock(&self.script).push_back(Err(error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LanguageModel for MockProvider {
    fn complete(&self, prompt: &str, _options: &CompletionOptions) -> Result<String, ModelError> {
        lock(&self.prompts).push(prompt.to_string());

        match lock(&self.script).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(err)) => Err(err.into()),
            None => Ok(self.default_response.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
