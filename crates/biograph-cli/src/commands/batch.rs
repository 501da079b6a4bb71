//! Batch command implementation.

use crate::app::App;
use crate::cli::BatchArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use biograph_domain::{OutputFormat, QueryOptions};
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the batch command.
///
/// Returns whether every question was answered.
pub async fn execute_batch(
    args: BatchArgs,
    app: &App,
    config: &Config,
    formatter: &Formatter,
) -> Result<bool> {
    let questions = read_questions(&args.file)?;

    let options = QueryOptions {
        format: args.format.map(Into::into).unwrap_or(config.settings.format),
        force_generation: args.force_generation,
    };

    let mut runner = app.runner();
    if let Some(workers) = args.workers {
        if workers == 0 {
            return Err(CliError::InvalidInput("Workers must be at least 1".to_string()));
        }
        runner = runner.with_workers(workers);
    }

    info!(questions = questions.len(), workers = runner.workers(), "Running batch");
    let outcomes = runner.run(questions, options).await;

    if options.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for (i, outcome) in outcomes.iter().enumerate() {
            println!("{}", formatter.info(&format!("[{}] {}", i + 1, outcome.question)));
            println!("{}", formatter.outcome(outcome, options.format, false));
            println!();
        }
        println!("{}", formatter.batch_summary(&outcomes));
    }

    Ok(outcomes.iter().all(|o| o.success))
}

/// Read one question per line, skipping blank lines and `#` comments.
pub fn read_questions(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_questions_skips_blanks_and_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("questions.txt");
        fs::write(
            &path,
            "# oncology\nWhat drugs target EGFR?\n\n   \n  Which genes are associated with asthma?  \n# done\n",
        )
        .unwrap();

        let questions = read_questions(&path).unwrap();
        assert_eq!(
            questions,
            vec![
                "What drugs target EGFR?".to_string(),
                "Which genes are associated with asthma?".to_string(),
            ]
        );
    }

    #[test]
    fn test_read_questions_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_questions(&dir.path().join("none.txt"));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
