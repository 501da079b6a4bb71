//! BioGraph Template Catalog
//!
//! The deterministic front half of question routing.
//!
//! - [`TemplateCatalog`]: the ordered, immutable set of BKB query templates
//! - [`IntentClassifier`]: keyword-phrase intent classification with confidence
//! - [`TemplateMatcher`]: template scoring, selection and suggestions
//! - [`extract`]: regex-driven parameter extraction from question text
//!
//! # Examples
//!
//! ```
//! use biograph_catalog::{IntentClassifier, MatcherConfig, TemplateCatalog, TemplateMatcher};
//!
//! let catalog = TemplateCatalog::builtin();
//! let classifier = IntentClassifier::new();
//! let matcher = TemplateMatcher::new(&catalog, MatcherConfig::default());
//!
//! let question = "What drugs target EGFR?";
//! let classification = classifier.classify(question);
//! let found = matcher.find(question, &classification).unwrap();
//! assert_eq!(found.template.name, "drugs_targeting_gene");
//! ```

#![warn(missing_docs)]

mod builtin;
mod catalog;
mod classifier;
mod error;
pub mod extract;
mod matcher;

pub use builtin::builtin_templates;
pub use catalog::TemplateCatalog;
pub use classifier::IntentClassifier;
pub use error::{CatalogError, Result};
pub use matcher::{MatcherConfig, NoMatch, Suggestion, TemplateMatch, TemplateMatcher};
