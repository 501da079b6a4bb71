//! Catalog error types

use thiserror::Error;

/// Errors raised while building a catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two templates share a name
    #[error("Duplicate template name: {0}")]
    DuplicateTemplate(String),

    /// A template is malformed
    #[error("Invalid template {name}: {reason}")]
    InvalidTemplate {
        /// Template name
        name: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
