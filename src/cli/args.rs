//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    ask::AskArgs, batch::BatchCommands, completions::CompletionsArgs, config::ConfigCommands,
};

#[derive(Parser)]
#[command(name = "batchbot")]
#[command(author, version, about = "Pharmaceutical batch tracking assistant")]
#[command(long_about = "Answers plain-language questions about pharmaceutical batches (location, handler, history, status) from a local SQLite record store.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Record store path (default: from config, then the user data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question
    Ask(AskArgs),

    /// Start an interactive chat session
    Chat,

    /// Create the schema and load sample data
    Seed,

    /// Look up batch records directly
    #[command(subcommand)]
    Batch(BatchCommands),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (tables for listings)
    #[default]
    Auto,
    /// Plain text
    Text,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Whether this format prints structured data instead of text
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_collects_words() {
        let cli = Cli::parse_from(["batchbot", "ask", "Where", "is", "VDT-052025-A?"]);
        match cli.command {
            Commands::Ask(args) => assert_eq!(args.query(), "Where is VDT-052025-A?"),
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from(["batchbot", "seed", "--db", "/tmp/x.db", "-f", "json"]);
        assert_eq!(cli.global.db, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(cli.global.format, OutputFormat::Json);
        assert!(cli.global.format.is_structured());
    }
}
