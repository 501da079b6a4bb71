//! Validator configuration

use serde::{Deserialize, Serialize};

/// Which static checks run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Well-formedness checks (delimiters, clause order, RETURN)
    pub check_syntax: bool,

    /// Node labels and relationship types must exist in the schema
    pub check_labels: bool,

    /// Properties must exist on the label their variable is bound to
    pub check_properties: bool,

    /// Every `$param` must be bound, with the declared type
    pub check_parameters: bool,

    /// Permit CREATE, MERGE, DELETE and other write clauses
    pub allow_write_clauses: bool,

    /// Treat a missing LIMIT as an error instead of a warning
    pub require_limit: bool,

    /// Offer the closest known name for unknown labels and types
    pub suggest_names: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            check_syntax: true,
            check_labels: true,
            check_properties: true,
            check_parameters: true,
            allow_write_clauses: false,
            require_limit: false,
            suggest_names: true,
        }
    }
}

impl ValidatorConfig {
    /// Syntax and parameter checks only; no schema lookups
    pub fn permissive() -> Self {
        Self {
            check_syntax: true,
            check_labels: false,
            check_properties: false,
            check_parameters: true,
            allow_write_clauses: false,
            require_limit: false,
            suggest_names: false,
        }
    }

    /// Every check, and a LIMIT clause is mandatory
    pub fn strict() -> Self {
        Self {
            require_limit: true,
            ..Self::default()
        }
    }
}
