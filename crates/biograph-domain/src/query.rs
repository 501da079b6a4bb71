//! Query candidates and their parameter bindings

use crate::template::{ParamSpec, QueryTemplate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar bound to a query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
}

impl ParamValue {
    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "boolean",
            ParamValue::Integer(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Parameter bindings, ordered by name
pub type Parameters = BTreeMap<String, ParamValue>;

/// Where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Rendered from a catalog template
    Template,
    /// Produced by the language model
    Generated,
}

/// One attempt at answering a question
///
/// Owned by the refinement loop for the duration of a single attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCandidate {
    /// Cypher text
    pub query_text: String,

    /// Origin of the text
    pub source: CandidateSource,

    /// Values bound to `$name` placeholders
    pub parameters: Parameters,

    /// Originating template, for template candidates
    pub template_name: Option<String>,

    /// Parameter schema of the originating template; empty for generated text
    pub declared_parameters: Vec<ParamSpec>,
}

impl QueryCandidate {
    /// Candidate rendered from a template and its extracted parameters
    pub fn from_template(template: &QueryTemplate, parameters: Parameters) -> Self {
        Self {
            query_text: template.cypher.clone(),
            source: CandidateSource::Template,
            parameters,
            template_name: Some(template.name.clone()),
            declared_parameters: template.parameters.clone(),
        }
    }

    /// Candidate produced by generation
    pub fn generated(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            source: CandidateSource::Generated,
            parameters: Parameters::new(),
            template_name: None,
            declared_parameters: Vec::new(),
        }
    }

    /// Whether this candidate was rendered from a template
    pub fn is_template(&self) -> bool {
        self.source == CandidateSource::Template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{EntityKind, ParamSpec};
    use crate::Intent;

    fn template() -> QueryTemplate {
        QueryTemplate {
            name: "drugs_targeting_gene".into(),
            description: "Drugs acting on a gene".into(),
            cypher: "MATCH (d:Drug)-[:TARGETS]->(g:Gene {symbol: $gene_symbol}) RETURN d.name LIMIT $limit".into(),
            parameters: vec![
                ParamSpec::entity("gene_symbol", EntityKind::Gene),
                ParamSpec::limit(10),
            ],
            intent: Intent::DrugTargetInteraction,
            example_question: "What drugs target EGFR?".into(),
            tags: vec![],
            keywords: vec![],
        }
    }

    #[test]
    fn test_from_template_carries_schema() {
        let mut params = Parameters::new();
        params.insert("gene_symbol".into(), "EGFR".into());
        let candidate = QueryCandidate::from_template(&template(), params);

        assert!(candidate.is_template());
        assert_eq!(candidate.template_name.as_deref(), Some("drugs_targeting_gene"));
        assert_eq!(candidate.declared_parameters.len(), 2);
    }

    #[test]
    fn test_generated_has_no_bindings() {
        let candidate = QueryCandidate::generated("MATCH (n) RETURN n LIMIT 1");
        assert!(!candidate.is_template());
        assert!(candidate.parameters.is_empty());
        assert!(candidate.declared_parameters.is_empty());
    }

    #[test]
    fn test_param_value_untagged_json() {
        let value: ParamValue = serde_json::from_str("5").unwrap();
        assert_eq!(value, ParamValue::Integer(5));
        let value: ParamValue = serde_json::from_str("0.5").unwrap();
        assert_eq!(value, ParamValue::Float(0.5));
        let value: ParamValue = serde_json::from_str("\"TP53\"").unwrap();
        assert_eq!(value, ParamValue::Text("TP53".into()));
    }
}
