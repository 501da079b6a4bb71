//! BioGraph CLI - Ask biomedical questions of the QIAGEN knowledge graph.

use anyhow::Context;
use biograph_cli::{commands, logging, repl, App, Cli, Command, Config, Formatter};
use clap::Parser;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every question asked was answered.
async fn run() -> anyhow::Result<bool> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_env_overrides()
        .context("Invalid environment override")?;

    logging::init(cli.verbose, &config.settings.log_level);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(color_enabled);

    let command = cli.command.unwrap_or(Command::Repl);
    let answered = match command {
        // Offline commands
        Command::Suggest(args) => {
            commands::execute_suggest(args, &config, &formatter)?;
            true
        }
        Command::Templates(args) => {
            commands::execute_templates(args, &formatter)?;
            true
        }
        Command::Schema => {
            commands::execute_schema(&config)?;
            true
        }
        Command::Status => {
            commands::execute_status(&config, &formatter)
                .await
                .context("Status check failed")?;
            true
        }
        // Commands that need the database and the model
        cmd => {
            config.validate().context("Invalid configuration")?;
            let app = App::connect(&config)
                .await
                .context("Failed to start the query pipeline")?;

            match cmd {
                Command::Query(args) => {
                    commands::execute_query(args, &app, &config, &formatter).await?
                }
                Command::Batch(args) => {
                    commands::execute_batch(args, &app, &config, &formatter).await?
                }
                _ => {
                    repl::run_repl(&app, &config, &formatter).await?;
                    true
                }
            }
        }
    };

    Ok(answered)
}
