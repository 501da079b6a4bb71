//! Output formatting for the CLI.

use biograph_catalog::Suggestion;
use biograph_domain::{OutputFormat, QueryOutcome, QueryTemplate};
use biograph_router::PipelineMetrics;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest question shown in a batch summary row
const QUESTION_WIDTH: usize = 48;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format one answered question.
    ///
    /// JSON answers are printed bare so they can be piped; other formats get
    /// a status line and any diagnostics.
    pub fn outcome(&self, outcome: &QueryOutcome, format: OutputFormat, show_query: bool) -> String {
        if format == OutputFormat::Json && outcome.success && !show_query {
            return outcome.answer_text.clone();
        }

        let mut lines = Vec::new();
        if outcome.success {
            lines.push(outcome.answer_text.clone());
        } else {
            lines.push(self.error(&outcome.answer_text));
        }

        if show_query {
            if let Some(query) = &outcome.final_query {
                lines.push(String::new());
                lines.push(self.colorize("Query:", "cyan"));
                lines.push(query.clone());
            }
        }

        for diagnostic in &outcome.diagnostics {
            lines.push(self.warning(&diagnostic.to_string()));
        }

        lines.push(self.info(&self.provenance(outcome)));
        lines.join("\n")
    }

    /// One-line description of how the answer was produced.
    pub fn provenance(&self, outcome: &QueryOutcome) -> String {
        let source = match &outcome.template_name {
            Some(name) => format!("template {}", name),
            None => outcome.query_type.to_string(),
        };
        format!(
            "{} | intent {} ({:.2}) | {} attempt(s) | {} row(s)",
            source,
            outcome.intent,
            outcome.confidence,
            outcome.attempts_used,
            outcome.row_count()
        )
    }

    /// Summary table of a batch run.
    pub fn batch_summary(&self, outcomes: &[QueryOutcome]) -> String {
        if outcomes.is_empty() {
            return self.warning("No questions to answer.");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Question", "Status", "Type", "Attempts", "Rows"]);

        for (i, outcome) in outcomes.iter().enumerate() {
            let status = if outcome.success { "ok" } else { "failed" };
            builder.push_record([
                (i + 1).to_string(),
                truncate(&outcome.question, QUESTION_WIDTH),
                status.to_string(),
                outcome.query_type.to_string(),
                outcome.attempts_used.to_string(),
                outcome.row_count().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let succeeded = outcomes.iter().filter(|o| o.success).count();
        let footer = format!("{}/{} question(s) answered", succeeded, outcomes.len());
        let footer = if succeeded == outcomes.len() {
            self.success(&footer)
        } else {
            self.warning(&footer)
        };

        format!("{}\n{}", table, footer)
    }

    /// Ranked template suggestions.
    pub fn suggestions(&self, suggestions: &[Suggestion]) -> String {
        if suggestions.is_empty() {
            return self.warning("No matching templates; the question would be answered by generation.");
        }

        let mut builder = Builder::default();
        builder.push_record(["Template", "Score", "Description"]);
        for suggestion in suggestions {
            builder.push_record([
                suggestion.template_name.clone(),
                format!("{:.2}", suggestion.score),
                suggestion.description.clone(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Template listing.
    pub fn templates<'a>(&self, templates: impl IntoIterator<Item = &'a QueryTemplate>) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Name", "Intent", "Parameters", "Example"]);

        let mut count = 0;
        for template in templates {
            let parameters: Vec<&str> = template.parameters.iter().map(|p| p.name.as_str()).collect();
            builder.push_record([
                template.name.clone(),
                template.intent.to_string(),
                parameters.join(", "),
                template.example_question.clone(),
            ]);
            count += 1;
        }

        if count == 0 {
            return self.warning("No templates found.");
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Session metrics.
    pub fn metrics(&self, metrics: &PipelineMetrics) -> String {
        metrics.summary()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
