//! Error types shared across the pipeline

use crate::execution::ExecutionError;
use crate::intent::Intent;
use crate::validation::ValidationIssue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a language-model collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Endpoint unreachable, model missing, or credentials rejected
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// The call exceeded its deadline
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    /// Provider asked us to slow down
    #[error("Model rate limit exceeded")]
    RateLimited,

    /// Response arrived but could not be read
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    /// Anything else
    #[error("Model error: {0}")]
    Other(String),
}

impl ModelError {
    /// Whether the model cannot be used for the rest of this question
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ModelError::Unavailable(_))
    }
}

/// Which external collaborator failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    /// The graph database
    Database,
    /// The language model
    LanguageModel,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::Database => f.write_str("graph database"),
            Collaborator::LanguageModel => f.write_str("language model"),
        }
    }
}

/// Everything that can go wrong while answering one question
///
/// The first four variants are recoverable and are recorded as diagnostics;
/// the rest end the question. None of them escapes the public query
/// contract as a fault.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineError {
    /// Several intents scored equally; the first declared one was used
    #[error("Ambiguous intent: {chosen} tied with {}", format_intents(.tied_with))]
    ClassificationAmbiguity {
        /// Intent that was used
        chosen: Intent,
        /// Intents with the same score
        tied_with: Vec<Intent>,
    },

    /// A template matched but a required value was not in the question
    #[error("Template '{template}' is missing parameters: {}", .missing.join(", "))]
    TemplateParameterMissing {
        /// Template name
        template: String,
        /// Parameters that could not be extracted
        missing: Vec<String>,
    },

    /// Static validation rejected a candidate
    #[error("Validation failed on attempt {attempt}: {}", format_issues(.issues))]
    ValidationError {
        /// Attempt number (1-based)
        attempt: usize,
        /// Problems found
        issues: Vec<ValidationIssue>,
    },

    /// The database rejected or aborted a candidate
    #[error("Execution failed on attempt {attempt}: {error}")]
    ExecutionError {
        /// Attempt number (1-based)
        attempt: usize,
        /// Database error
        error: ExecutionError,
    },

    /// Every allowed attempt failed
    #[error("Gave up after {attempts} attempt(s); last error: {last_error}")]
    GenerationExhausted {
        /// Attempts made
        attempts: usize,
        /// Description of the final failure
        last_error: String,
    },

    /// A collaborator could not be reached
    #[error("The {collaborator} is unavailable: {message}")]
    CollaboratorUnavailable {
        /// Which collaborator
        collaborator: Collaborator,
        /// Underlying message
        message: String,
    },

    /// A worker stopped before producing an outcome
    #[error("Internal error: {message}")]
    Internal {
        /// What went wrong
        message: String,
    },
}

impl PipelineError {
    /// Whether this error ends the question
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineError::GenerationExhausted { .. }
                | PipelineError::CollaboratorUnavailable { .. }
                | PipelineError::Internal { .. }
        )
    }
}

fn format_intents(intents: &[Intent]) -> String {
    intents
        .iter()
        .map(|i| i.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure loading a graph schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// File could not be read
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        /// Path attempted
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Content is not a valid schema document
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        let exhausted = PipelineError::GenerationExhausted {
            attempts: 3,
            last_error: "Unknown node label: Drugz".into(),
        };
        assert!(exhausted.is_terminal());

        let missing = PipelineError::TemplateParameterMissing {
            template: "similar_drugs_by_target".into(),
            missing: vec!["drug_name".into()],
        };
        assert!(!missing.is_terminal());
        assert_eq!(
            missing.to_string(),
            "Template 'similar_drugs_by_target' is missing parameters: drug_name"
        );
    }

    #[test]
    fn test_pipeline_error_serializes_with_kind_tag() {
        let err = PipelineError::CollaboratorUnavailable {
            collaborator: Collaborator::Database,
            message: "connection refused".into(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "collaborator_unavailable");
        assert_eq!(json["collaborator"], "database");
    }

    #[test]
    fn test_model_error_unavailability() {
        assert!(ModelError::Unavailable("down".into()).is_unavailable());
        assert!(!ModelError::Timeout(Duration::from_secs(5)).is_unavailable());
    }
}
