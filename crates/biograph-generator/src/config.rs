//! Configuration for the query generator

use biograph_domain::CompletionOptions;
use serde::{Deserialize, Serialize};

/// Configuration for the query generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Include question/Cypher example pairs in the prompt
    pub use_few_shot_examples: bool,

    /// Maximum example pairs to include
    pub max_few_shot_examples: usize,

    /// Sampling temperature for the model call
    pub temperature: f32,

    /// Token budget for the model response
    pub max_tokens: u32,

    /// Common schema patterns listed in the schema context
    pub max_schema_patterns: usize,
}

impl GeneratorConfig {
    /// Options for the model call
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.use_few_shot_examples && self.max_few_shot_examples == 0 {
            return Err(
                "max_few_shot_examples must be greater than 0 when few-shot examples are enabled"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            use_few_shot_examples: true,
            max_few_shot_examples: 5,
            temperature: 0.0,
            max_tokens: 1024,
            max_schema_patterns: 7,
        }
    }
}

impl GeneratorConfig {
    /// Concise preset: short prompts for small local models
    pub fn concise() -> Self {
        Self {
            use_few_shot_examples: true,
            max_few_shot_examples: 2,
            temperature: 0.0,
            max_tokens: 512,
            max_schema_patterns: 3,
        }
    }

    /// Thorough preset: every example and pattern, larger response budget
    pub fn thorough() -> Self {
        Self {
            use_few_shot_examples: true,
            max_few_shot_examples: 15,
            temperature: 0.0,
            max_tokens: 2048,
            max_schema_patterns: 20,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
