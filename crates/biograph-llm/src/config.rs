//! Provider selection

use crate::ollama::{self, OllamaProvider};
use crate::openai::{self, OpenAiConfig, OpenAiProvider};
use crate::LlmError;
use biograph_domain::LanguageModel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Which backend answers completions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI-compatible API
    OpenAi,
}

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend
    pub provider: ProviderKind,
    /// Model name; provider default when empty
    pub model: String,
    /// Endpoint override; provider default when empty
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: "llama3".to_string(),
            endpoint: String::new(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: ollama::DEFAULT_TIMEOUT_SECS,
            max_retries: ollama::DEFAULT_MAX_RETRIES,
        }
    }
}

impl LlmConfig {
    /// Per-request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Construct the configured provider
    pub fn build(&self) -> Result<Arc<dyn LanguageModel>, LlmError> {
        match self.provider {
            ProviderKind::Ollama => {
                let endpoint = if self.endpoint.is_empty() {
                    ollama::DEFAULT_ENDPOINT
                } else {
                    &self.endpoint
                };
                info!(endpoint, model = %self.model, "Using Ollama provider");
                let provider = OllamaProvider::with_timeout(endpoint, &self.model, self.timeout())?
                    .with_max_retries(self.max_retries);
                Ok(Arc::new(provider))
            }
            ProviderKind::OpenAi => {
                let api_key = std::env::var(&self.api_key_env).map_err(|_| {
                    LlmError::Config(format!("{} is not set", self.api_key_env))
                })?;
                let config = OpenAiConfig {
                    api_key,
                    base_url: if self.endpoint.is_empty() {
                        openai::DEFAULT_BASE_URL.to_string()
                    } else {
                        self.endpoint.clone()
                    },
                    model: if self.model.is_empty() {
                        openai::DEFAULT_MODEL.to_string()
                    } else {
                        self.model.clone()
                    },
                    timeout_secs: self.timeout_secs,
                    max_retries: self.max_retries,
                };
                info!(model = %config.model, "Using OpenAI provider");
                Ok(Arc::new(OpenAiProvider::new(config)?))
            }
        }
    }
}
