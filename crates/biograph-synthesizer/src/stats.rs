//! Summary statistics over result rows

use biograph_domain::Row;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Value kind shared by every non-null cell of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Only numbers
    Numeric,
    /// Only strings
    Text,
    /// Only booleans
    Boolean,
    /// Only lists or maps
    Nested,
    /// More than one of the above
    Mixed,
    /// No non-null values
    Empty,
}

/// Smallest, largest and mean value of a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    /// Minimum
    pub min: f64,
    /// Maximum
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
}

/// Statistics for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    /// Column name
    pub name: String,
    /// Kind of its values
    pub kind: ColumnKind,
    /// Rows with a non-null value
    pub non_null: usize,
    /// Range, for numeric columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,
    /// Distinct values, for text columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<usize>,
}

/// Statistics for a whole result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Number of rows
    pub total_results: usize,
    /// Number of distinct columns
    pub column_count: usize,
    /// Per-column statistics, in column order
    pub columns: Vec<ColumnStats>,
}

impl SummaryStats {
    /// Compute statistics for `rows`
    pub fn from_rows(rows: &[Row]) -> Self {
        let columns: Vec<ColumnStats> = column_names(rows)
            .into_iter()
            .map(|name| column_stats(rows, name))
            .collect();

        Self {
            total_results: rows.len(),
            column_count: columns.len(),
            columns,
        }
    }

    /// Statistics for a named column
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Column names across all rows, in first-seen order
pub fn column_names(rows: &[Row]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn column_stats(rows: &[Row], name: String) -> ColumnStats {
    let values: Vec<&Value> = rows
        .iter()
        .filter_map(|row| row.get(&name))
        .filter(|v| !v.is_null())
        .collect();

    let kind = values
        .iter()
        .map(|v| kind_of(v))
        .reduce(|a, b| if a == b { a } else { ColumnKind::Mixed })
        .unwrap_or(ColumnKind::Empty);

    let range = match kind {
        ColumnKind::Numeric => numeric_range(values.iter().filter_map(|v| v.as_f64())),
        _ => None,
    };
    let unique = match kind {
        ColumnKind::Text => Some(
            values
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<HashSet<_>>()
                .len(),
        ),
        _ => None,
    };

    ColumnStats {
        name,
        kind,
        non_null: values.len(),
        range,
        unique,
    }
}

fn kind_of(value: &Value) -> ColumnKind {
    match value {
        Value::Number(_) => ColumnKind::Numeric,
        Value::String(_) => ColumnKind::Text,
        Value::Bool(_) => ColumnKind::Boolean,
        Value::Array(_) | Value::Object(_) => ColumnKind::Nested,
        Value::Null => ColumnKind::Empty,
    }
}

fn numeric_range(values: impl Iterator<Item = f64>) -> Option<NumericRange> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }
    (count > 0).then(|| NumericRange {
        min,
        max,
        mean: sum / count as f64,
    })
}
