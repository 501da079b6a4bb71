//! OpenAI-compatible chat completions provider

use crate::{backoff_delay, LlmError};
use biograph_domain::{CompletionOptions, LanguageModel, ModelError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

const SYSTEM_MESSAGE: &str =
    "You are an expert Neo4j Cypher developer working with a biomedical knowledge graph.";

/// OpenAI API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}

impl OpenAiConfig {
    /// Defaults overridden by `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.api_key = key;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = url;
        }
        config
    }
}

/// OpenAI chat completions client
#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::blocking::Client,
    config: OpenAiConfig,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new client
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("OpenAI API key is not set".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_once(&self, body: &serde_json::Value) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(Duration::from_secs(self.config.timeout_secs))
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LlmError::ModelNotAvailable(format!(
                "{} (HTTP {})",
                self.config.model, status
            )));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
    }

    /// Send one chat completion, retrying transient failures
    pub fn chat(&self, prompt: &str, options: &CompletionOptions) -> Result<String, LlmError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_MESSAGE},
                {"role": "user", "content": prompt},
            ],
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        let max_attempts = self.config.max_retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(model = %self.config.model, attempt, "Calling OpenAI chat completions");
            match self.request_once(&body) {
                Ok(text) => return Ok(text),
                Err(err @ (LlmError::ModelNotAvailable(_) | LlmError::InvalidResponse(_))) => {
                    return Err(err)
                }
                Err(err) if attempt >= max_attempts => return Err(err),
                Err(err) => {
                    let delay = backoff_delay(attempt);
                    warn!(attempt, ?delay, error = %err, "OpenAI request failed, retrying");
                    std::thread::sleep(delay);
                }
            }
        }
    }
}

impl LanguageModel for OpenAiProvider {
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, ModelError> {
        self.chat(prompt, options).map_err(ModelError::from)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_requires_api_key() {
        let err = OpenAiProvider::new(OpenAiConfig::default()).unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_openai_config_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_openai_provider_keeps_model() {
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
            ..OpenAiConfig::default()
        })
        .unwrap();
        assert_eq!(provider.model(), "gpt-4o-mini");
        assert_eq!(provider.name(), "openai");
    }
}
