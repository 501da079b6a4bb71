//! Template module - parameterized queries bound to an intent

use crate::query::ParamValue;
use crate::Intent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a template parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// Text value
    Text,
    /// Whole number
    Integer,
    /// Floating point number (integers are accepted)
    Float,
    /// Boolean flag
    Boolean,
}

impl ParamType {
    /// Whether a bound value satisfies this type
    pub fn accepts(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (ParamType::Text, ParamValue::Text(_))
                | (ParamType::Integer, ParamValue::Integer(_))
                | (ParamType::Float, ParamValue::Float(_))
                | (ParamType::Float, ParamValue::Integer(_))
                | (ParamType::Boolean, ParamValue::Bool(_))
        )
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Text => "text",
            ParamType::Integer => "integer",
            ParamType::Float => "float",
            ParamType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Kind of named entity a parameter refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Drug name, e.g. "Imatinib"
    Drug,
    /// Compound name, e.g. "Aspirin"
    Compound,
    /// Gene symbol, e.g. "EGFR"
    Gene,
    /// Disease name, e.g. "Breast Cancer"
    Disease,
    /// Pathway name, e.g. "MAPK Signaling Pathway"
    Pathway,
    /// Tissue name, e.g. "Brain"
    Tissue,
}

impl EntityKind {
    /// Lower-case name used in logs and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Drug => "drug",
            EntityKind::Compound => "compound",
            EntityKind::Gene => "gene",
            EntityKind::Disease => "disease",
            EntityKind::Pathway => "pathway",
            EntityKind::Tissue => "tissue",
        }
    }
}

/// Where a parameter value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "entity")]
pub enum ParamSource {
    /// Named entity mentioned in the question
    Entity(EntityKind),
    /// Result size ("top 5", "limit 20")
    Limit,
    /// Minimum count ("at least 2")
    Count,
    /// Fractional threshold ("above 80%")
    Threshold,
    /// Never extracted; always the default
    Fixed,
}

/// One entry of a template's parameter schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Placeholder name (without the leading `$`)
    pub name: String,

    /// Declared type
    pub param_type: ParamType,

    /// Extraction strategy
    pub source: ParamSource,

    /// Value used when nothing is extracted; `None` makes the parameter required
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    /// Required text parameter naming an entity
    pub fn entity(name: &str, kind: EntityKind) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Text,
            source: ParamSource::Entity(kind),
            default: None,
        }
    }

    /// The conventional `limit` parameter
    pub fn limit(default: i64) -> Self {
        Self {
            name: "limit".to_string(),
            param_type: ParamType::Integer,
            source: ParamSource::Limit,
            default: Some(ParamValue::Integer(default)),
        }
    }

    /// Integer lower bound extracted from phrases like "at least 3"
    pub fn count(name: &str, default: i64) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Integer,
            source: ParamSource::Count,
            default: Some(ParamValue::Integer(default)),
        }
    }

    /// Fractional threshold extracted from phrases like "above 80%"
    pub fn threshold(name: &str, default: f64) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Float,
            source: ParamSource::Threshold,
            default: Some(ParamValue::Float(default)),
        }
    }

    /// Float parameter that always takes its default
    pub fn fixed_float(name: &str, default: f64) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Float,
            source: ParamSource::Fixed,
            default: Some(ParamValue::Float(default)),
        }
    }

    /// Integer parameter that always takes its default
    pub fn fixed_integer(name: &str, default: i64) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Integer,
            source: ParamSource::Fixed,
            default: Some(ParamValue::Integer(default)),
        }
    }

    /// Whether the question must supply this value
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Entity kind, for entity parameters
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self.source {
            ParamSource::Entity(kind) => Some(kind),
            _ => None,
        }
    }
}

/// An immutable, parameterized Cypher query bound to one intent
///
/// Templates are created once when the catalog is built and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTemplate {
    /// Unique name
    pub name: String,

    /// One-line description shown in suggestions
    pub description: String,

    /// Cypher text with `$name` placeholders
    pub cypher: String,

    /// Parameter schema, in placeholder order
    pub parameters: Vec<ParamSpec>,

    /// Intent this template answers
    pub intent: Intent,

    /// Representative question
    pub example_question: String,

    /// Multi-word phrases that signal this template
    pub tags: Vec<String>,

    /// Single-word domain terms that signal this template
    pub keywords: Vec<String>,
}

impl QueryTemplate {
    /// Parameters with no default
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParamSpec> {
        self.parameters.iter().filter(|p| p.is_required())
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::Text.accepts(&ParamValue::Text("EGFR".into())));
        assert!(ParamType::Float.accepts(&ParamValue::Integer(3)));
        assert!(!ParamType::Integer.accepts(&ParamValue::Float(3.0)));
        assert!(!ParamType::Text.accepts(&ParamValue::Integer(1)));
    }

    #[test]
    fn test_entity_params_are_required() {
        let spec = ParamSpec::entity("drug_name", EntityKind::Drug);
        assert!(spec.is_required());
        assert_eq!(spec.entity_kind(), Some(EntityKind::Drug));

        let limit = ParamSpec::limit(10);
        assert!(!limit.is_required());
        assert_eq!(limit.entity_kind(), None);
        assert_eq!(limit.default, Some(ParamValue::Integer(10)));
    }
}
