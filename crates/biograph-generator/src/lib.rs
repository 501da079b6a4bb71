//! BioGraph Query Generator
//!
//! Turns a natural-language question into a Cypher statement by prompting a
//! language model with the graph schema, a handful of relevant example
//! queries and, on repair attempts, the earlier failures with their errors.
//!
//! # Architecture
//!
//! ```text
//! Question + Schema + Prior attempts → PromptBuilder → LanguageModel → parser → QueryCandidate
//! ```
//!
//! The generator never validates or executes what it produces; the refinement
//! loop in `biograph-router` does both and calls back here on failure.
//!
//! # Example Usage
//!
//! ```
//! use biograph_domain::GraphSchema;
//! use biograph_generator::{GeneratorConfig, QueryGenerator};
//! use biograph_llm::MockProvider;
//! use std::sync::Arc;
//!
//! let model = Arc::new(MockProvider::new("MATCH (d:Drug) RETURN d.name LIMIT 10"));
//! let generator = QueryGenerator::new(model, GeneratorConfig::default());
//! let schema = GraphSchema::builtin().unwrap();
//!
//! let candidate = generator.generate("List some drugs", &schema, &[]).unwrap();
//! assert_eq!(candidate.query_text, "MATCH (d:Drug) RETURN d.name LIMIT 10");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod examples;
mod generator;
mod parser;
mod prompt;
mod types;

pub use config::GeneratorConfig;
pub use error::{GeneratorError, Result};
pub use examples::{all_examples, format_examples, select_examples, FewShotExample};
pub use generator::QueryGenerator;
pub use parser::extract_cypher;
pub use prompt::PromptBuilder;
pub use types::PriorAttempt;
