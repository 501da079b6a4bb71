//! The terminal artifact of the pipeline and the caller's options

use crate::error::PipelineError;
use crate::execution::Row;
use crate::intent::Intent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mechanism that produced the final query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// A catalog template
    Template,
    /// Language-model generation
    #[serde(rename = "text2query")]
    Text2Query,
}

impl QueryType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Template => "template",
            QueryType::Text2Query => "text2query",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation of the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Short prose summary
    #[default]
    Natural,
    /// Pretty-printed JSON document
    Json,
    /// Bordered text table
    Table,
}

impl OutputFormat {
    /// Format name
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Natural => "natural",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "natural" | "text" => Ok(OutputFormat::Natural),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!("Invalid output format: {}", other)),
        }
    }
}

/// Per-call options of the query contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Answer presentation
    pub format: OutputFormat,
    /// Skip the template matcher and go straight to generation
    pub force_generation: bool,
}

impl QueryOptions {
    /// Options with the given format
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Options that bypass the template matcher
    pub fn forced_generation() -> Self {
        Self {
            force_generation: true,
            ..Self::default()
        }
    }
}

/// What one question resolves to, success or not
///
/// Invariants: `attempts_used` never exceeds the configured bound, and
/// `answer_text` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// The question as asked
    pub question: String,

    /// Presentation of the result, or an explanation of the failure
    pub answer_text: String,

    /// Rows of the successful execution
    pub raw_results: Vec<Row>,

    /// Mechanism behind the final query
    pub query_type: QueryType,

    /// Attempts consumed
    pub attempts_used: usize,

    /// Whether a query executed successfully
    pub success: bool,

    /// Classified intent
    pub intent: Intent,

    /// Classification confidence
    pub confidence: f64,

    /// Template used, if the template path succeeded
    pub template_name: Option<String>,

    /// Last query text attempted
    pub final_query: Option<String>,

    /// Terminal error, for failed outcomes
    pub error: Option<PipelineError>,

    /// Recoverable problems met along the way
    pub diagnostics: Vec<PipelineError>,
}

impl QueryOutcome {
    /// Number of rows returned
    pub fn row_count(&self) -> usize {
        self.raw_results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&QueryType::Text2Query).unwrap(),
            "\"text2query\""
        );
        assert_eq!(
            serde_json::to_string(&QueryType::Template).unwrap(),
            "\"template\""
        );
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_options() {
        let options = QueryOptions::default();
        assert_eq!(options.format, OutputFormat::Natural);
        assert!(!options.force_generation);
        assert!(QueryOptions::forced_generation().force_generation);
    }
}
