//! BioGraph Domain Layer
//!
//! Core vocabulary shared by every stage of the question-answering pipeline:
//! intents, query templates, candidates, validation outcomes, execution results
//! and the terminal [`QueryOutcome`]. The crate also defines the narrow
//! synchronous interfaces through which the pipeline reaches its two external
//! collaborators, the language model and the graph database.
//!
//! ## Key Concepts
//!
//! - **Intent**: closed set of biomedical question classes
//! - **QueryTemplate**: immutable, parameterized Cypher bound to one intent
//! - **QueryCandidate**: one attempt at answering a question
//! - **GraphSchema**: read-only description of labels, relationship types and properties
//! - **QueryOutcome**: what every call to the pipeline ends in, success or not
//!
//! ## Architecture
//!
//! Pure data and trait definitions only. Infrastructure (HTTP model clients,
//! the Neo4j driver) lives in other crates and implements the traits in
//! [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod execution;
pub mod intent;
pub mod outcome;
pub mod query;
pub mod schema;
pub mod template;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use error::{Collaborator, ModelError, PipelineError, SchemaError};
pub use execution::{ErrorCategory, ExecutionError, ExecutionResult, Row};
pub use intent::{ClassificationResult, Intent};
pub use outcome::{OutputFormat, QueryOptions, QueryOutcome, QueryType};
pub use query::{CandidateSource, ParamValue, Parameters, QueryCandidate};
pub use schema::{GraphSchema, NodeType, QueryPattern, RelationshipType};
pub use template::{EntityKind, ParamSource, ParamSpec, ParamType, QueryTemplate};
pub use traits::{CompletionOptions, GraphExecutor, LanguageModel};
pub use validation::{ValidationIssue, ValidationOutcome, ValidationWarning};
