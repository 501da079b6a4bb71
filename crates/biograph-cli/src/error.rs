//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pipeline configuration error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] biograph_router::ConfigError),

    /// Database driver error
    #[error("Neo4j error: {0}")]
    Neo4j(#[from] biograph_neo4j::Neo4jError),

    /// Language model setup error
    #[error("LLM error: {0}")]
    Llm(#[from] biograph_llm::LlmError),

    /// Schema loading error
    #[error("Schema error: {0}")]
    Schema(#[from] biograph_domain::SchemaError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
