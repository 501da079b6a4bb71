//! Result synthesis entry point

use crate::config::SynthesizerConfig;
use crate::natural::summarize;
use crate::stats::SummaryStats;
use crate::table::render_table;
use biograph_domain::{ExecutionResult, OutputFormat, PipelineError, Row};
use serde_json::{json, Value};
use tracing::debug;

/// Turns result rows into user-facing text
#[derive(Debug, Clone, Default)]
pub struct ResultSynthesizer {
    config: SynthesizerConfig,
}

impl ResultSynthesizer {
    /// Create a synthesizer with the given limits
    pub fn new(config: SynthesizerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Render an execution result in `format`
    ///
    /// A failed result renders as a one-line description of its error.
    pub fn synthesize(&self, result: &ExecutionResult, question: &str, format: OutputFormat) -> String {
        match &result.error {
            Some(error) => format!("Query failed: {}", error),
            None => self.synthesize_rows(&result.rows, question, format),
        }
    }

    /// Render rows in `format`; never returns empty text
    pub fn synthesize_rows(&self, rows: &[Row], question: &str, format: OutputFormat) -> String {
        debug!(rows = rows.len(), format = format.as_str(), "Synthesizing answer");

        match format {
            OutputFormat::Json => self.to_json(rows, question),
            _ if rows.is_empty() => no_results(question),
            OutputFormat::Natural => summarize(rows, self.config.max_listed_values),
            OutputFormat::Table => {
                render_table(rows, self.config.max_table_rows, self.config.max_cell_width)
            }
        }
    }

    /// Statistics for a result set
    pub fn summary_stats(&self, rows: &[Row]) -> SummaryStats {
        SummaryStats::from_rows(rows)
    }

    /// Explain why a question could not be answered
    pub fn explain_failure(&self, question: &str, error: &PipelineError, attempts_used: usize) -> String {
        let reason = match error {
            PipelineError::GenerationExhausted { last_error, .. } => last_error.clone(),
            other => other.to_string(),
        };
        format!(
            "Could not answer \"{}\" after {} attempt{}. Last error: {}",
            question.trim(),
            attempts_used,
            if attempts_used == 1 { "" } else { "s" },
            reason
        )
    }

    fn to_json(&self, rows: &[Row], question: &str) -> String {
        let mut document = json!({
            "question": question,
            "count": rows.len(),
            "results": rows,
            "summary": serde_json::to_value(SummaryStats::from_rows(rows)).unwrap_or(Value::Null),
        });
        if rows.is_empty() {
            document["message"] = Value::String(no_results(question));
        }
        serde_json::to_string_pretty(&document).unwrap_or_else(|_| no_results(question))
    }
}

fn no_results(question: &str) -> String {
    format!("No results found for: {}", question.trim())
}
