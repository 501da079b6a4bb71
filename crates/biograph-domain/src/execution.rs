//! Execution results reported by the graph database collaborator

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One result record: column name to value, in column order
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Broad class of a database-reported failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The database rejected the statement as malformed
    Syntax,
    /// The statement failed while running
    Runtime,
    /// The call exceeded its deadline
    Timeout,
    /// The database could not be reached
    Unavailable,
}

impl ErrorCategory {
    /// Whether a fresh attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorCategory::Unavailable)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Runtime => "runtime",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

/// Structured failure from the database collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{category} error: {message}")]
pub struct ExecutionError {
    /// Failure class, drives retry decisions
    pub category: ErrorCategory,
    /// Driver or server message
    pub message: String,
}

impl ExecutionError {
    /// Create an error of the given category
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    /// Statement rejected as malformed
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Syntax, message)
    }

    /// Statement failed at runtime
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Runtime, message)
    }

    /// Deadline exceeded
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Timeout, message)
    }

    /// Database unreachable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Unavailable, message)
    }
}

/// Rows returned by one execution, or the error that prevented them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Returned records; empty is a valid answer
    pub rows: Vec<Row>,
    /// Failure, if execution did not complete
    pub error: Option<ExecutionError>,
}

impl ExecutionResult {
    /// Successful result
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows, error: None }
    }

    /// Failed result
    pub fn failed(error: ExecutionError) -> Self {
        Self {
            rows: Vec::new(),
            error: Some(error),
        }
    }

    /// Whether execution completed
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl From<Result<Vec<Row>, ExecutionError>> for ExecutionResult {
    fn from(result: Result<Vec<Row>, ExecutionError>) -> Self {
        match result {
            Ok(rows) => Self::from_rows(rows),
            Err(e) => Self::failed(e),
        }
    }
}
