//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its two
//! collaborators. Both are synchronous and blocking; concurrency is added by
//! the batch layer, not by the pipeline itself.

use crate::error::ModelError;
use crate::execution::{ExecutionError, Row};
use crate::query::Parameters;
use std::sync::Arc;

/// Sampling options for one completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    /// Sampling temperature; near zero minimizes variance
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 1024,
        }
    }
}

/// Text completion from a language model
///
/// Implemented by the infrastructure layer (biograph-llm). Responses are
/// best-effort and may differ between calls with identical input.
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, ModelError>;

    /// Provider name for logs
    fn name(&self) -> &str {
        "language-model"
    }
}

/// Read-only query execution against the graph database
///
/// Implemented by the infrastructure layer (biograph-neo4j). The pipeline
/// never owns the connection lifecycle; it only calls `execute`.
pub trait GraphExecutor: Send + Sync {
    /// Run a statement with bound parameters
    fn execute(&self, query: &str, parameters: &Parameters) -> Result<Vec<Row>, ExecutionError>;
}

impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, ModelError> {
        (**self).complete(prompt, options)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: GraphExecutor + ?Sized> GraphExecutor for Arc<T> {
    fn execute(&self, query: &str, parameters: &Parameters) -> Result<Vec<Row>, ExecutionError> {
        (**self).execute(query, parameters)
    }
}
