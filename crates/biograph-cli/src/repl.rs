//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::app::App;
use crate::config::{biograph_dir, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use biograph_domain::{OutputFormat, QueryOptions};
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// REPL command type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave the REPL
    Exit,
    /// Print the command list
    Help,
    /// Rank templates for a question
    Suggest(String),
    /// Switch the answer format
    Format(OutputFormat),
    /// Toggle template bypass
    Force(bool),
    /// Print session metrics
    Stats,
    /// Toggle printing of the final query
    ShowQuery(bool),
    /// Answer a question
    Ask(String),
}

/// Parse a REPL input line.
///
/// Lines starting with `:` are commands; anything else is a question.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match line {
        "exit" | "quit" | "q" => return Ok(ReplCommand::Exit),
        "help" | "?" => return Ok(ReplCommand::Help),
        _ => {}
    }

    let Some(command) = line.strip_prefix(':') else {
        return Ok(ReplCommand::Ask(line.to_string()));
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "stats" => Ok(ReplCommand::Stats),
        "suggest" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: :suggest <question>".to_string()));
            }
            Ok(ReplCommand::Suggest(rest.to_string()))
        }
        "format" => rest
            .parse::<OutputFormat>()
            .map(ReplCommand::Format)
            .map_err(|_| CliError::InvalidInput("Usage: :format natural|json|table".to_string())),
        "force" => parse_toggle(rest, ":force").map(ReplCommand::Force),
        "query" => parse_toggle(rest, ":query").map(ReplCommand::ShowQuery),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: :{}. Type 'help' for available commands.",
            name
        ))),
    }
}

fn parse_toggle(value: &str, usage: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(CliError::InvalidInput(format!("Usage: {} on|off", usage))),
    }
}

/// Session state that REPL commands change.
struct Session {
    options: QueryOptions,
    show_query: bool,
}

/// Run the interactive REPL.
pub async fn run_repl(app: &App, config: &Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("BioGraph REPL - Ask a question, or type 'help' for commands, 'exit' to quit")
    );
    println!();

    // Initialize readline editor
    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
    })?;
    editor.set_max_history_size(config.settings.history_size).ok();

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut session = Session {
        options: QueryOptions::with_format(config.settings.format),
        show_query: false,
    };

    loop {
        let prompt = if session.options.force_generation {
            "biograph (generate)> "
        } else {
            "biograph> "
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(command) => execute_repl_command(command, app, &mut session, formatter).await,
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// Execute a REPL command.
async fn execute_repl_command(
    command: ReplCommand,
    app: &App,
    session: &mut Session,
    formatter: &Formatter,
) {
    match command {
        ReplCommand::Exit => {}
        ReplCommand::Help => print_help(formatter),
        ReplCommand::Suggest(question) => {
            let suggestions = app.pipeline().get_suggestions(&question);
            println!("{}", formatter.suggestions(&suggestions));
        }
        ReplCommand::Format(format) => {
            session.options.format = format;
            println!("{}", formatter.success(&format!("Format: {}", format.as_str())));
        }
        ReplCommand::Force(force) => {
            session.options.force_generation = force;
            let state = if force { "on" } else { "off" };
            println!("{}", formatter.success(&format!("Forced generation {}", state)));
        }
        ReplCommand::ShowQuery(show) => {
            session.show_query = show;
            let state = if show { "on" } else { "off" };
            println!("{}", formatter.success(&format!("Query display {}", state)));
        }
        ReplCommand::Stats => {
            println!("{}", formatter.metrics(&app.pipeline().metrics()));
        }
        ReplCommand::Ask(question) => {
            let outcome = app.runner().run_one(question, session.options).await;
            println!(
                "{}",
                formatter.outcome(&outcome, session.options.format, session.show_query)
            );
            println!();
        }
    }
}

fn get_history_path() -> Result<PathBuf> {
    let dir = biograph_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <question>                    - Answer a question");
    println!("  :suggest <question>           - Rank templates for a question");
    println!("  :format natural|json|table    - Set the answer format");
    println!("  :force on|off                 - Skip templates and always generate");
    println!("  :query on|off                 - Print the Cypher behind each answer");
    println!("  :stats                        - Show session metrics");
    println!("  help, ?                       - Show this help");
    println!("  exit, quit, q                 - Exit REPL");
    println!();
}
