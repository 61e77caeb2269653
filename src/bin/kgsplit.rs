//! kgsplit CLI - chunk documents for knowledge-graph extraction
//!
//! # Examples
//!
//! ```bash
//! # Split one document by sentences
//! kgsplit split data/processed/manual.txt
//!
//! # Split a directory by paragraphs and keep the chunks
//! kgsplit split data/processed --strategy paragraph -o chunks.json
//!
//! # Persist extracted triplets, then validate them
//! kgsplit save-triplets response.json --document manual
//! kgsplit validate --report data/output/validation_report.json
//! ```

use clap::Parser;
use kgsplit::cli::{run, Cli, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(format: LogFormat) {
    // Stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "kgsplit=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
