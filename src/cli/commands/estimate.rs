//! Estimate command - token estimate of a text

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::loader::read_utf8;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the estimate command
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Text to estimate
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

/// Estimate response
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub chars: usize,
    pub tokens: usize,
    /// Chunks needed at the configured budget, ignoring overlap
    pub min_chunks: usize,
}

/// Execute the estimate command
pub async fn execute(
    args: EstimateArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = match (&args.file, args.text) {
        (Some(path), _) => read_utf8(path)?,
        (None, Some(text)) => text,
        (None, None) => return Err("Provide a text or --file <path>.".into()),
    };

    let chars = text.chars().count();
    let max_chars = services.splitter.settings().max_chars();
    let response = EstimateResponse {
        chars,
        tokens: services.splitter.estimate_tokens(&text),
        min_chunks: chars.div_ceil(max_chars).max(1),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "~{} tokens ({} chars, at least {} chunks of {} chars)",
                colors::number(&response.tokens.to_string()),
                colors::number(&response.chars.to_string()),
                colors::number(&response.min_chunks.to_string()),
                max_chars
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
