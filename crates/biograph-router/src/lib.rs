//! BioGraph Query Router
//!
//! The hybrid question-answering pipeline. A question is classified, matched
//! against the template catalog and, when no template fits or the template
//! fails, handed to the language model through a bounded repair loop.
//!
//! # Architecture
//!
//! ```text
//! question ─► IntentClassifier ─► TemplateMatcher ──┐
//!                                                   ▼
//!                         ┌──────────── RefinementLoop ◄─── QueryGenerator
//!                         │   validate ─► execute ─► retry
//!                         ▼
//!                  ResultSynthesizer ─► QueryOutcome
//! ```
//!
//! The model and the database are reached through the synchronous
//! [`LanguageModel`](biograph_domain::LanguageModel) and
//! [`GraphExecutor`](biograph_domain::GraphExecutor) traits. [`BatchRunner`]
//! adds bounded concurrency on top using tokio's blocking pool.
//!
//! # Example Usage
//!
//! ```
//! use biograph_domain::{ExecutionError, GraphExecutor, Parameters, QueryOptions, QueryType, Row};
//! use biograph_llm::MockProvider;
//! use biograph_router::{PipelineConfig, QueryPipeline};
//! use std::sync::Arc;
//!
//! struct EmptyGraph;
//!
//! impl GraphExecutor for EmptyGraph {
//!     fn execute(&self, _query: &str, _params: &Parameters) -> Result<Vec<Row>, ExecutionError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let pipeline = QueryPipeline::new(
//!     PipelineConfig::default(),
//!     Arc::new(MockProvider::default()),
//!     Arc::new(EmptyGraph),
//! )
//! .unwrap();
//!
//! let outcome = pipeline.query("What drugs target EGFR?", QueryOptions::default());
//! assert!(outcome.success);
//! assert_eq!(outcome.query_type, QueryType::Template);
//! assert_eq!(outcome.answer_text, "No results found for: What drugs target EGFR?");
//! ```

#![warn(missing_docs)]

pub mod batch;
pub mod config;
pub mod metrics;
pub mod pipeline;
pub mod refinement;

pub use batch::{batch_query, BatchRunner};
pub use config::{ConfigError, PipelineConfig};
pub use metrics::PipelineMetrics;
pub use pipeline::QueryPipeline;
pub use refinement::{
    CandidateGenerator, CandidateValidator, LoopStage, LoopSuccess, RefinementLoop,
    RefinementReport, NO_STATEMENT_MESSAGE,
};

// Catalog types that appear in the pipeline's API
pub use biograph_catalog::{MatcherConfig, Suggestion};
