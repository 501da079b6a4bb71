//! Graph schema - the read-only shape of the knowledge graph
//!
//! The schema is loaded once at process start, either from the built-in BKB
//! description or from a JSON file with the same layout, and is shared
//! read-only by the validator and the generator afterwards.
//!
//! # Examples
//!
//! ```
//! use biograph_domain::GraphSchema;
//!
//! let schema = GraphSchema::builtin().unwrap();
//! assert!(schema.has_label("Drug"));
//! assert!(schema.label_has_property("Gene", "symbol"));
//! ```

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_SCHEMA: &str = include_str!("../data/bkb_schema.json");

/// A node label and its properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeType {
    /// Label as used in Cypher
    pub label: String,
    /// Human description
    #[serde(default)]
    pub description: String,
    /// Property names
    #[serde(default)]
    pub properties: Vec<String>,
    /// Approximate node count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// A relationship type, its endpoints and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipType {
    /// Type as used in Cypher
    #[serde(rename = "type")]
    pub rel_type: String,
    /// Human description
    #[serde(default)]
    pub description: String,
    /// Allowed source labels
    #[serde(default)]
    pub source: Vec<String>,
    /// Allowed target labels
    #[serde(default)]
    pub target: Vec<String>,
    /// Property names
    #[serde(default)]
    pub properties: Vec<String>,
}

/// A named, reusable match pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPattern {
    /// Pattern name
    pub name: String,
    /// What the pattern finds
    #[serde(default)]
    pub description: String,
    /// Cypher pattern text
    pub pattern: String,
}

/// Labels, relationship types and properties of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSchema {
    /// Display name of the graph
    #[serde(default)]
    pub name: String,
    /// Node types
    pub node_types: Vec<NodeType>,
    /// Relationship types
    pub relationship_types: Vec<RelationshipType>,
    /// Common patterns, most useful first
    #[serde(default)]
    pub common_patterns: Vec<QueryPattern>,
}

impl GraphSchema {
    /// The BKB schema shipped with the crate
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json_str(BUILTIN_SCHEMA)
    }

    /// Parse a schema document
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a schema document from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// All node labels, in document order
    pub fn node_labels(&self) -> Vec<&str> {
        self.node_types.iter().map(|n| n.label.as_str()).collect()
    }

    /// All relationship type names, in document order
    pub fn relationship_type_names(&self) -> Vec<&str> {
        self.relationship_types
            .iter()
            .map(|r| r.rel_type.as_str())
            .collect()
    }

    /// Whether the label exists
    pub fn has_label(&self, label: &str) -> bool {
        self.node_types.iter().any(|n| n.label == label)
    }

    /// Whether the relationship type exists
    pub fn has_relationship(&self, rel_type: &str) -> bool {
        self.relationship_types.iter().any(|r| r.rel_type == rel_type)
    }

    /// Properties of a label
    pub fn node_properties(&self, label: &str) -> Option<&[String]> {
        self.node_types
            .iter()
            .find(|n| n.label == label)
            .map(|n| n.properties.as_slice())
    }

    /// Properties of a relationship type
    pub fn relationship_properties(&self, rel_type: &str) -> Option<&[String]> {
        self.relationship_types
            .iter()
            .find(|r| r.rel_type == rel_type)
            .map(|r| r.properties.as_slice())
    }

    /// Whether a label defines a property
    pub fn label_has_property(&self, label: &str, property: &str) -> bool {
        self.node_properties(label)
            .is_some_and(|props| props.iter().any(|p| p == property))
    }

    /// Whether a relationship type defines a property
    pub fn relationship_has_property(&self, rel_type: &str, property: &str) -> bool {
        self.relationship_properties(rel_type)
            .is_some_and(|props| props.iter().any(|p| p == property))
    }

    /// Check a set of labels and types, returning one message per unknown name
    pub fn check_names(&self, labels: &[&str], rel_types: &[&str]) -> Vec<String> {
        let mut errors = Vec::new();
        for label in labels {
            if !self.has_label(label) {
                errors.push(format!("Invalid node label: {}", label));
            }
        }
        for rel in rel_types {
            if !self.has_relationship(rel) {
                errors.push(format!("Invalid relationship type: {}", rel));
            }
        }
        errors
    }

    /// Short human-readable overview
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} Schema\n\n", self.display_name()));
        out.push_str(&format!("Node Types ({}):\n", self.node_types.len()));
        out.push_str(&self.node_labels().join(", "));
        out.push_str(&format!(
            "\n\nRelationship Types ({}):\n",
            self.relationship_types.len()
        ));
        out.push_str(&self.relationship_type_names().join(", "));
        if !self.common_patterns.is_empty() {
            out.push_str("\n\nCommon Query Patterns:\n");
            for pattern in &self.common_patterns {
                out.push_str(&format!("- {}: {}\n", pattern.name, pattern.description));
            }
        }
        out
    }

    /// Compact schema context for query generation prompts
    ///
    /// Lists every label with its properties, every relationship type with its
    /// endpoints, and up to `max_patterns` common patterns.
    pub fn cypher_context(&self, max_patterns: usize) -> String {
        let mut lines = vec![format!(
            "# {} Schema for Cypher Query Generation",
            self.display_name()
        )];

        lines.push(String::new());
        lines.push("## Node Labels and Properties:".to_string());
        for node in &self.node_types {
            lines.push(format!("- {}: {}", node.label, node.properties.join(", ")));
        }

        lines.push(String::new());
        lines.push("## Relationship Types:".to_string());
        for rel in &self.relationship_types {
            let mut line = format!(
                "- ({})-[:{}]->({})",
                rel.source.join("|"),
                rel.rel_type,
                rel.target.join("|")
            );
            if !rel.properties.is_empty() {
                line.push_str(&format!(" properties: {}", rel.properties.join(", ")));
            }
            lines.push(line);
        }

        if max_patterns > 0 && !self.common_patterns.is_empty() {
            lines.push(String::new());
            lines.push("## Example Patterns:".to_string());
            for pattern in self.common_patterns.iter().take(max_patterns) {
                lines.push(format!("- {}: {}", pattern.name, pattern.pattern));
            }
        }

        lines.join("\n")
    }

    fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Knowledge Graph"
        } else {
            &self.name
        }
    }
}
