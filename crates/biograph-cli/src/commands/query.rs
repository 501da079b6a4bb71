//! Query command implementation.

use crate::app::App;
use crate::cli::QueryArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use biograph_domain::QueryOptions;
use biograph_validator::suggest_improvements;

/// Execute the query command.
///
/// Returns whether the question was answered.
pub async fn execute_query(
    args: QueryArgs,
    app: &App,
    config: &Config,
    formatter: &Formatter,
) -> Result<bool> {
    let question = args.question.trim().to_string();
    if question.is_empty() {
        return Err(CliError::InvalidInput("Question must not be empty".to_string()));
    }

    let options = QueryOptions {
        format: args.format.map(Into::into).unwrap_or(config.settings.format),
        force_generation: args.force_generation,
    };

    let outcome = app.runner().run_one(question, options).await;
    println!("{}", formatter.outcome(&outcome, options.format, args.show_query));

    if args.show_query {
        if let Some(query) = &outcome.final_query {
            for hint in suggest_improvements(query) {
                println!("{}", formatter.info(&format!("Hint: {}", hint)));
            }
        }
    }

    Ok(outcome.success)
}
