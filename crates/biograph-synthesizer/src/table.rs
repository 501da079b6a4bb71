//! Bordered table rendering

use crate::natural::display_value;
use crate::stats::column_names;
use biograph_domain::Row;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Render up to `max_rows` rows as a rounded table
///
/// Columns are the union of all row keys in first-seen order. Cells longer
/// than `max_cell_width` characters are cut with an ellipsis. A note below the
/// table reports rows left out.
pub(crate) fn render_table(rows: &[Row], max_rows: usize, max_cell_width: usize) -> String {
    let columns = column_names(rows);

    let mut builder = Builder::default();
    builder.push_record(columns.clone());
    for row in rows.iter().take(max_rows) {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| {
                let text = row.get(column).map(display_value).unwrap_or_default();
                truncate(&text, max_cell_width)
            })
            .collect();
        builder.push_record(cells);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut out = table.to_string();
    if rows.len() > max_rows {
        out.push_str(&format!(
            "\n... and {} more rows (showing {} of {})",
            rows.len() - max_rows,
            max_rows,
            rows.len()
        ));
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                serde_json::from_value(json!({"gene": format!("G{}", i), "score": i}))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let table = render_table(&make_rows(2), 50, 60);
        assert!(table.contains("gene"));
        assert!(table.contains("score"));
        assert!(table.contains("G0"));
        assert!(table.contains("G1"));
        assert!(table.starts_with('╭'));
        assert!(!table.contains("more rows"));
    }

    #[test]
    fn test_table_truncates_rows() {
        let table = render_table(&make_rows(55), 50, 60);
        assert!(table.contains("G49"));
        assert!(!table.contains("G50"));
        assert!(table.ends_with("... and 5 more rows (showing 50 of 55)"));
    }

    #[test]
    fn test_missing_cells_are_blank_and_long_cells_cut() {
        let rows: Vec<Row> = vec![
            serde_json::from_value(json!({"a": "x".repeat(100)})).unwrap(),
            serde_json::from_value(json!({"b": 1})).unwrap(),
        ];
        let table = render_table(&rows, 50, 10);
        assert!(table.contains("xxxxxxx..."));
        assert!(!table.contains(&"x".repeat(11)));
    }
}
