//! BioGraph Validator
//!
//! Static checks for candidate Cypher queries before they reach the graph.
//!
//! The validator provides:
//! - Syntax checks (delimiters, leading clause, RETURN, single statement)
//! - Rejection of write clauses
//! - Label and relationship type checks against the schema, with suggestions
//! - Property checks for variables bound to known labels
//! - Parameter binding and type checks
//!
//! # Examples
//!
//! ```
//! use biograph_domain::{GraphSchema, QueryCandidate};
//! use biograph_validator::{QueryValidator, ValidatorConfig};
//!
//! let schema = GraphSchema::builtin().unwrap();
//! let validator = QueryValidator::new(ValidatorConfig::default());
//!
//! let candidate = QueryCandidate::generated("MATCH (d:Drug) RETURN d.name LIMIT 5");
//! assert!(validator.validate(&candidate, &schema).valid);
//!
//! let candidate = QueryCandidate::generated("MATCH (d:Drugs) RETURN d.name LIMIT 5");
//! assert!(!validator.validate(&candidate, &schema).valid);
//! ```

#![warn(missing_docs)]

mod config;
mod lexer;
mod validator;

pub use config::ValidatorConfig;
pub use validator::{suggest_improvements, validate, QueryValidator};
