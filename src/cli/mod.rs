//! CLI adapter for kgsplit
//!
//! Provides the command-line interface over the chunking engine and the
//! triplet tooling. This module depends on `core/`; nothing in `core/`
//! depends on it.
//!
//! # Architecture
//!
//! ```text
//!     +------------------+
//!     |      cli/        |
//!     | (clap adapter)   |
//!     +--------+---------+
//!              |
//!              v
//!     +------------------+
//!     |     core/        |
//!     |  (domain logic)  |
//!     +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kgsplit - Document chunking for knowledge-graph extraction
///
/// Split long documents into overlapping, size-bounded chunks for a
/// language model, then persist and validate the extracted triplets.
#[derive(Parser, Debug)]
#[command(name = "kgsplit")]
#[command(version)]
#[command(about = "Chunk documents for knowledge-graph extraction", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Log format (logs go to stderr)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Config file (overrides KGSPLIT_CONFIG and the default locations)
    #[arg(long, global = true, env = "KGSPLIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Format of log lines written to stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a document, or every document under a directory, into chunks
    Split(commands::SplitArgs),

    /// Estimate the token count of a text
    Estimate(commands::EstimateArgs),

    /// Write extracted triplets to triplets.csv
    #[command(name = "save-triplets")]
    SaveTriplets(commands::SaveArgs),

    /// Check extracted triplets against their source text
    Validate(commands::ValidateArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  kgsplit completions bash > ~/.local/share/bash-completion/completions/kgsplit
    ///   zsh:   kgsplit completions zsh > ~/.zfunc/_kgsplit
    ///   fish:  kgsplit completions fish > ~/.config/fish/completions/kgsplit.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.log_config();

    // Create services
    let services = Arc::new(Services::new(config));

    // Execute command
    match cli.command {
        Commands::Split(args) => commands::split::execute(args, &services, cli.format).await,
        Commands::Estimate(args) => commands::estimate::execute(args, &services, cli.format).await,
        Commands::SaveTriplets(args) => commands::save::execute(args, &services, cli.format).await,
        Commands::Validate(args) => commands::validate::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
