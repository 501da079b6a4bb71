//! Error types for the Neo4j adapter

use biograph_domain::{ErrorCategory, ExecutionError};
use thiserror::Error;

/// Errors raised while connecting to or talking with Neo4j
#[derive(Debug, Error)]
pub enum Neo4jError {
    /// Invalid connection settings
    #[error("Invalid Neo4j configuration: {0}")]
    Config(String),

    /// The server could not be reached or rejected the credentials
    #[error("Failed to connect to Neo4j at {uri}: {message}")]
    Connection {
        /// Bolt URI attempted
        uri: String,
        /// Driver message
        message: String,
    },

    /// A statement failed
    #[error("Neo4j query failed: {0}")]
    Query(#[from] ExecutionError),

    /// Error reported by the driver
    #[error("Neo4j driver error: {0}")]
    Driver(#[from] neo4rs::Error),

    /// A result row could not be converted
    #[error("Failed to decode Neo4j row: {0}")]
    Decode(#[from] neo4rs::DeError),
}

/// Result type for Neo4j adapter operations
pub type Result<T> = std::result::Result<T, Neo4jError>;

/// Markers in driver and server messages, checked in order
const UNAVAILABLE_MARKERS: &[&str] = &[
    "serviceunavailable",
    "connection refused",
    "connection reset",
    "broken pipe",
    "authentication",
    "unauthorized",
    "failed to connect",
    "io error",
    "dns",
];
const TIMEOUT_MARKERS: &[&str] = &["timed out", "timeout", "transactiontimedout"];
const SYNTAX_MARKERS: &[&str] = &["syntaxerror", "invalid input", "variable `", "not defined"];

/// Sort a driver or server message into an [`ErrorCategory`]
///
/// Unrecognized messages are runtime errors, which the refinement loop may
/// retry.
pub fn categorize(message: &str) -> ErrorCategory {
    let lowered = message.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    if has(UNAVAILABLE_MARKERS) {
        ErrorCategory::Unavailable
    } else if has(TIMEOUT_MARKERS) {
        ErrorCategory::Timeout
    } else if has(SYNTAX_MARKERS) {
        ErrorCategory::Syntax
    } else {
        ErrorCategory::Runtime
    }
}

/// Convert a driver error into the domain execution error
pub(crate) fn to_execution_error(error: &neo4rs::Error) -> ExecutionError {
    let message = error.to_string();
    ExecutionError::new(categorize(&message), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_syntax() {
        assert_eq!(
            categorize("Neo.ClientError.Statement.SyntaxError: Invalid input 'RETRN'"),
            ErrorCategory::Syntax
        );
        assert_eq!(categorize("Variable `drg` not defined"), ErrorCategory::Syntax);
    }

    #[test]
    fn test_categorize_unavailable() {
        assert_eq!(
            categorize("IO error: Connection refused (os error 111)"),
            ErrorCategory::Unavailable
        );
        assert_eq!(
            categorize("Neo.ClientError.Security.Unauthorized: authentication failure"),
            ErrorCategory::Unavailable
        );
    }

    #[test]
    fn test_categorize_timeout_and_runtime() {
        assert_eq!(
            categorize("Neo.ClientError.Transaction.TransactionTimedOut"),
            ErrorCategory::Timeout
        );
        assert_eq!(
            categorize("Neo.ClientError.Statement.ArithmeticError: / by zero"),
            ErrorCategory::Runtime
        );
    }
}
