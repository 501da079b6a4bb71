//! BioGraph Result Synthesizer
//!
//! Converts the rows of a successful query into the answer shown to the user:
//! a short deterministic prose summary, a pretty JSON document, or a bordered
//! table. Also phrases the explanation attached to failed questions.
//!
//! Every rendering is a pure function of its inputs, and an empty row set
//! always yields `No results found for: <question>` rather than empty text.
//!
//! ```
//! use biograph_domain::OutputFormat;
//! use biograph_synthesizer::ResultSynthesizer;
//!
//! let synth = ResultSynthesizer::default();
//! let text = synth.synthesize_rows(&[], "Which drugs treat scurvy?", OutputFormat::Natural);
//! assert_eq!(text, "No results found for: Which drugs treat scurvy?");
//! ```

#![warn(missing_docs)]

mod config;
mod natural;
mod stats;
mod synthesizer;
mod table;

pub use config::SynthesizerConfig;
pub use stats::{column_names, ColumnKind, ColumnStats, NumericRange, SummaryStats};
pub use synthesizer::ResultSynthesizer;
