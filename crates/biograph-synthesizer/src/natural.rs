//! Deterministic prose summaries of result rows

use crate::stats::{ColumnKind, SummaryStats};
use biograph_domain::Row;
use serde_json::Value;
use std::collections::HashSet;

/// Summarize non-empty `rows` in a few lines of prose
///
/// Reports the row count, up to `max_values` distinct values of the first
/// text column and the range of every numeric column. When neither kind of
/// column exists the first rows are listed field by field.
pub(crate) fn summarize(rows: &[Row], max_values: usize) -> String {
    let count = rows.len();
    let mut lines = vec![format!(
        "Found {} result{}.",
        count,
        if count == 1 { "" } else { "s" }
    )];

    let stats = SummaryStats::from_rows(rows);

    if let Some(column) = stats.columns.iter().find(|c| c.kind == ColumnKind::Text) {
        let distinct = distinct_text(rows, &column.name);
        let shown: Vec<&str> = distinct.iter().take(max_values).copied().collect();
        let mut line = format!("{}: {}", column.name, shown.join(", "));
        if distinct.len() > shown.len() {
            line.push_str(&format!(" ... and {} more", distinct.len() - shown.len()));
        }
        lines.push(line);
    }

    for column in &stats.columns {
        if let Some(range) = column.range {
            if range.min == range.max {
                lines.push(format!("{}: {}", column.name, format_number(range.min)));
            } else {
                lines.push(format!(
                    "{} ranges from {} to {}",
                    column.name,
                    format_number(range.min),
                    format_number(range.max)
                ));
            }
        }
    }

    if lines.len() == 1 {
        for (i, row) in rows.iter().take(max_values).enumerate() {
            let fields: Vec<String> = row
                .iter()
                .map(|(key, value)| format!("{}: {}", key, display_value(value)))
                .collect();
            lines.push(format!("{}. {}", i + 1, fields.join(", ")));
        }
        if count > max_values {
            lines.push(format!("... and {} more", count - max_values));
        }
    }

    lines.join("\n")
}

/// Distinct string values of a column, first-seen order
fn distinct_text<'a>(rows: &'a [Row], column: &str) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.get(column).and_then(Value::as_str))
        .filter(|s| seen.insert(*s))
        .collect()
}

/// Render a number without float noise: whole numbers lose the fraction
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{:.4}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Cell text: strings unquoted, null empty, everything else compact JSON
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
