//! Configuration for result synthesis

use serde::{Deserialize, Serialize};

/// Limits applied when rendering results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// Distinct values listed in a natural-language summary
    pub max_listed_values: usize,

    /// Rows rendered in table output
    pub max_table_rows: usize,

    /// Characters shown per table cell before truncation
    pub max_cell_width: usize,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            max_listed_values: 5,
            max_table_rows: 50,
            max_cell_width: 60,
        }
    }
}
