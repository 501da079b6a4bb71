//! Template registry

use crate::builtin::builtin_templates;
use crate::{CatalogError, Result};
use biograph_domain::{Intent, QueryTemplate};
use std::collections::HashSet;

/// Immutable, ordered set of query templates
///
/// Built once at start-up and shared read-only afterwards. Iteration order is
/// registration order, which the matcher uses to break ties.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<QueryTemplate>,
}

impl TemplateCatalog {
    /// Build a catalog, rejecting duplicate names and undeclared parameters
    pub fn new(templates: Vec<QueryTemplate>) -> Result<Self> {
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.name.as_str()) {
                return Err(CatalogError::DuplicateTemplate(template.name.clone()));
            }
            if template.cypher.trim().is_empty() {
                return Err(CatalogError::InvalidTemplate {
                    name: template.name.clone(),
                    reason: "query text is empty".to_string(),
                });
            }
            if let Some(spec) = template
                .parameters
                .iter()
                .find(|spec| !template.cypher.contains(&format!("${}", spec.name)))
            {
                return Err(CatalogError::InvalidTemplate {
                    name: template.name.clone(),
                    reason: format!("parameter ${} is declared but never used", spec.name),
                });
            }
        }
        Ok(Self { templates })
    }

    /// The built-in BKB catalog
    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// Look up a template by exact name
    pub fn get(&self, name: &str) -> Option<&QueryTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Templates answering one intent, in catalog order
    pub fn by_intent(&self, intent: Intent) -> impl Iterator<Item = &QueryTemplate> {
        self.templates.iter().filter(move |t| t.intent == intent)
    }

    /// All templates in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &QueryTemplate> {
        self.templates.iter()
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog has no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biograph_domain::ParamSpec;

    fn template(name: &str, cypher: &str) -> QueryTemplate {
        QueryTemplate {
            name: name.to_string(),
            description: String::new(),
            cypher: cypher.to_string(),
            parameters: vec![ParamSpec::limit(10)],
            intent: Intent::GeneralQuery,
            example_question: String::new(),
            tags: vec![],
            keywords: vec![],
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.len(), 20);
        assert_eq!(catalog.names()[0], "similar_drugs_by_target");
        assert!(catalog.get("drugs_targeting_gene").is_some());
        assert!(catalog.get("no_such_template").is_none());
    }

    #[test]
    fn test_by_intent_preserves_order() {
        let catalog = TemplateCatalog::builtin();
        let names: Vec<_> = catalog
            .by_intent(Intent::DrugTargetInteraction)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["drugs_targeting_gene", "targets_of_drug"]);
        assert_eq!(catalog.by_intent(Intent::IndicationExpansion).count(), 6);
        assert_eq!(catalog.by_intent(Intent::GeneralQuery).count(), 0);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = TemplateCatalog::new(vec![
            template("a", "MATCH (n) RETURN n LIMIT $limit"),
            template("a", "MATCH (m) RETURN m LIMIT $limit"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateTemplate(name)) if name == "a"));
    }

    #[test]
    fn test_unused_parameter_rejected() {
        let result = TemplateCatalog::new(vec![template("a", "MATCH (n) RETURN n LIMIT 5")]);
        assert!(matches!(result, Err(CatalogError::InvalidTemplate { .. })));
    }

    #[test]
    fn test_builtin_passes_construction_checks() {
        let catalog = TemplateCatalog::new(TemplateCatalog::builtin().iter().cloned().collect());
        assert!(catalog.is_ok());
    }
}
