//! CLI command definitions and argument parsing.

use biograph_domain::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BioGraph CLI - Ask biomedical questions of the knowledge graph.
#[derive(Debug, Parser)]
#[command(name = "biograph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "BIOGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Answer presentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    /// Prose summary (default)
    Natural,
    /// JSON document
    Json,
    /// Bordered table
    Table,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a question
    Query(QueryArgs),

    /// Answer every question in a file (one per line)
    Batch(BatchArgs),

    /// Show the templates that best fit a question
    Suggest(SuggestArgs),

    /// List query templates
    Templates(TemplatesArgs),

    /// Print the graph schema
    Schema,

    /// Check the database connection
    Status,

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the query command.
#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// Question in natural language
    pub question: String,

    /// Answer format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Skip templates and generate the query with the language model
    #[arg(long)]
    pub force_generation: bool,

    /// Print the Cypher query that produced the answer
    #[arg(long)]
    pub show_query: bool,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// File with one question per line; blank lines and `#` comments are skipped
    pub file: PathBuf,

    /// Answer format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Skip templates for every question
    #[arg(long)]
    pub force_generation: bool,

    /// Questions answered concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Arguments for the suggest command.
#[derive(Debug, Parser)]
pub struct SuggestArgs {
    /// Question in natural language
    pub question: String,

    /// Maximum number of suggestions
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the templates command.
#[derive(Debug, Parser)]
pub struct TemplatesArgs {
    /// Only list templates for this intent (e.g. drug_repurposing)
    #[arg(short, long)]
    pub intent: Option<String>,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Natural => OutputFormat::Natural,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Table => OutputFormat::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_repl() {
        let cli = Cli::parse_from(["biograph"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_query_command() {
        let cli = Cli::parse_from([
            "biograph",
            "query",
            "What drugs target EGFR?",
            "--format",
            "table",
            "--force-generation",
            "--show-query",
        ]);
        match cli.command {
            Some(Command::Query(args)) => {
                assert_eq!(args.question, "What drugs target EGFR?");
                assert_eq!(args.format, Some(FormatArg::Table));
                assert!(args.force_generation);
                assert!(args.show_query);
            }
            other => panic!("Expected Query command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["biograph", "status", "--verbose", "--no-color", "--config", "b.toml"]);
        assert!(matches!(cli.command, Some(Command::Status)));
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("b.toml")));
    }

    #[test]
    fn test_suggest_and_templates() {
        let cli = Cli::parse_from(["biograph", "suggest", "drugs for asthma", "--limit", "3"]);
        assert!(matches!(cli.command, Some(Command::Suggest(SuggestArgs { limit: Some(3), .. }))));

        let cli = Cli::parse_from(["biograph", "templates", "--intent", "pathway_analysis"]);
        match cli.command {
            Some(Command::Templates(args)) => assert_eq!(args.intent.as_deref(), Some("pathway_analysis")),
            other => panic!("Expected Templates command, got {:?}", other),
        }
    }

    #[test]
    fn test_format_conversion() {
        assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(FormatArg::Natural), OutputFormat::Natural);
    }
}
