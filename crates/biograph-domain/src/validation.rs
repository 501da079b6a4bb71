//! Validation outcomes for query candidates

use crate::template::ParamType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured problem found while validating a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The text is not well-formed Cypher
    Syntax {
        /// What is wrong
        message: String,
    },

    /// A write or administrative clause in a read-only context
    ForbiddenClause {
        /// The offending keyword
        clause: String,
    },

    /// Node label not present in the schema
    UnknownLabel {
        /// Label as written
        label: String,
        /// Closest known label, if any
        suggestion: Option<String>,
    },

    /// Relationship type not present in the schema
    UnknownRelationship {
        /// Type as written
        rel_type: String,
        /// Closest known type, if any
        suggestion: Option<String>,
    },

    /// Property not defined on the label its variable is bound to
    UnknownProperty {
        /// Variable the property was accessed through
        variable: String,
        /// Label or relationship type of the variable
        owner: String,
        /// Property as written
        property: String,
    },

    /// A `$param` with no bound value
    MissingParameter {
        /// Parameter name
        name: String,
    },

    /// A bound value of the wrong type
    ParameterTypeMismatch {
        /// Parameter name
        name: String,
        /// Declared type
        expected: ParamType,
        /// Type of the bound value
        found: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Syntax { message } => write!(f, "Syntax error: {}", message),
            ValidationIssue::ForbiddenClause { clause } => {
                write!(f, "Forbidden clause: {} is not allowed in read-only queries", clause)
            }
            ValidationIssue::UnknownLabel { label, suggestion } => {
                write!(f, "Unknown node label: {}", label)?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean {}?)", s)?;
                }
                Ok(())
            }
            ValidationIssue::UnknownRelationship {
                rel_type,
                suggestion,
            } => {
                write!(f, "Unknown relationship type: {}", rel_type)?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean {}?)", s)?;
                }
                Ok(())
            }
            ValidationIssue::UnknownProperty {
                variable,
                owner,
                property,
            } => write!(
                f,
                "Unknown property: {}.{} ({} has no property '{}')",
                variable, property, owner, property
            ),
            ValidationIssue::MissingParameter { name } => {
                write!(f, "Missing parameter: ${} has no bound value", name)
            }
            ValidationIssue::ParameterTypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "Parameter type mismatch: ${} expects {} but got {}",
                name, expected, found
            ),
        }
    }
}

/// Non-blocking observation about a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationWarning {
    /// No LIMIT clause
    MissingLimit,
    /// Variable-length pattern with no upper bound
    UnboundedVariableLength,
    /// Several MATCH clauses but no WHERE
    PossibleCartesianProduct,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationWarning::MissingLimit => "query has no LIMIT clause",
            ValidationWarning::UnboundedVariableLength => {
                "variable-length pattern has no upper bound"
            }
            ValidationWarning::PossibleCartesianProduct => {
                "multiple MATCH clauses without WHERE may produce a cartesian product"
            }
        };
        f.write_str(text)
    }
}

/// Result of validating a candidate
///
/// A pure function of (candidate, schema).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True when `errors` is empty
    pub valid: bool,

    /// Every problem found, in check order
    pub errors: Vec<ValidationIssue>,

    /// Advisory findings
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationOutcome {
    /// Build an outcome from collected findings
    pub fn from_findings(errors: Vec<ValidationIssue>, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Outcome with no findings at all
    pub fn passed() -> Self {
        Self::from_findings(Vec::new(), Vec::new())
    }

    /// Errors joined into one line, for prompts and logs
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_validity_follows_errors() {
        assert!(ValidationOutcome::passed().valid);

        let outcome = ValidationOutcome::from_findings(
            vec![ValidationIssue::MissingParameter {
                name: "drug_name".into(),
            }],
            vec![ValidationWarning::MissingLimit],
        );
        assert!(!outcome.valid);
        assert_eq!(
            outcome.error_summary(),
            "Missing parameter: $drug_name has no bound value"
        );
    }

    #[test]
    fn test_unknown_label_mentions_suggestion() {
        let issue = ValidationIssue::UnknownLabel {
            label: "Drugs".into(),
            suggestion: Some("Drug".into()),
        };
        assert_eq!(
            issue.to_string(),
            "Unknown node label: Drugs (did you mean Drug?)"
        );
    }
}
