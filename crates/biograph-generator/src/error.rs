//! Error types for the query generator

use biograph_domain::ModelError;
use thiserror::Error;

/// Errors that can occur while generating a query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// The language model call failed
    #[error("LLM error: {0}")]
    Model(#[from] ModelError),

    /// The model answered but no Cypher statement could be found in it
    #[error("Model response contained no Cypher statement: {0}")]
    NoQueryFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GeneratorError {
    /// Whether the language model cannot be used again for this question
    pub fn is_unavailable(&self) -> bool {
        matches!(self, GeneratorError::Model(err) if err.is_unavailable())
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
