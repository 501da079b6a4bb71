//! Suggest command implementation. Runs offline.

use crate::cli::SuggestArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use biograph_catalog::{IntentClassifier, Suggestion, TemplateCatalog, TemplateMatcher};

/// Execute the suggest command.
pub fn execute_suggest(args: SuggestArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let limit = args.limit.unwrap_or(config.pipeline.suggestion_limit);
    if limit == 0 {
        return Err(CliError::InvalidInput("Limit must be at least 1".to_string()));
    }

    let catalog = TemplateCatalog::builtin();
    let classification = IntentClassifier::new().classify(&args.question);
    println!(
        "{}",
        formatter.info(&format!(
            "Intent: {} (confidence {:.2})",
            classification.intent, classification.confidence
        ))
    );

    let suggestions = suggest(&catalog, config, &args.question, limit);
    println!("{}", formatter.suggestions(&suggestions));
    Ok(())
}

/// Rank catalog templates for a question with the configured weights.
pub fn suggest(catalog: &TemplateCatalog, config: &Config, question: &str, limit: usize) -> Vec<Suggestion> {
    TemplateMatcher::new(catalog, config.pipeline.matcher.clone()).get_suggestions(question, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_ranks_matching_template_first() {
        let catalog = TemplateCatalog::builtin();
        let suggestions = suggest(&catalog, &Config::default(), "What drugs target EGFR?", 3);
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= 3);
        assert_eq!(suggestions[0].template_name, "drugs_targeting_gene");
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let args = SuggestArgs {
            question: "What drugs target EGFR?".to_string(),
            limit: Some(0),
        };
        let result = execute_suggest(args, &Config::default(), &Formatter::new(false));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
