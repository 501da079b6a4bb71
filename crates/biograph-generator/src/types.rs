//! Types passed into generation

use serde::{Deserialize, Serialize};

/// A failed attempt fed back to the model on repair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorAttempt {
    /// Query text that was tried
    pub query: String,

    /// Why it failed: validation errors or the database message
    pub error: String,
}

impl PriorAttempt {
    /// Create a prior attempt record
    pub fn new(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            error: error.into(),
        }
    }
}
