//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::splitter::Strategy;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show the extraction prompt template
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: Option<String>,
    pub splitter: SplitterView,
    pub paths: PathsView,
    pub extraction: ExtractionView,
    pub validation_limit: usize,
}

#[derive(Debug, Serialize)]
pub struct SplitterView {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_chars: usize,
    pub overlap_chars: usize,
    pub min_chunk_size: usize,
    pub strategy: Strategy,
    pub sentence_terminator: String,
}

#[derive(Debug, Serialize)]
pub struct PathsView {
    pub input_dir: String,
    pub processed_dir: String,
    pub output_dir: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractionView {
    pub model: String,
    pub temperature: f32,
    pub max_concurrent_chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    let settings = services.splitter.settings();

    let response = ConfigResponse {
        config_file: Config::user_config_file()
            .filter(|p| p.exists())
            .map(|p| p.to_string_lossy().into_owned()),
        splitter: SplitterView {
            chunk_size: config.splitter.chunk_size,
            chunk_overlap: config.splitter.chunk_overlap,
            max_chars: settings.max_chars(),
            overlap_chars: settings.overlap_chars(),
            min_chunk_size: config.splitter.min_chunk_size,
            strategy: config.splitter.strategy,
            sentence_terminator: config.splitter.sentence_terminator.clone(),
        },
        paths: PathsView {
            input_dir: config.paths.input_dir.to_string_lossy().into_owned(),
            processed_dir: config.paths.processed_dir.to_string_lossy().into_owned(),
            output_dir: config.paths.output_dir.to_string_lossy().into_owned(),
        },
        extraction: ExtractionView {
            model: config.extraction.model.clone(),
            temperature: config.extraction.temperature,
            max_concurrent_chunks: config.extraction.max_concurrent_chunks,
            prompt_template: args
                .all
                .then(|| config.extraction.prompt_template.clone()),
        },
        validation_limit: config.validation.limit,
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            if let Some(file) = &response.config_file {
                println!("  config_file: {file}");
            }
            println!("  splitter:");
            println!("    chunk_size: {} tokens", response.splitter.chunk_size);
            println!("    chunk_overlap: {} tokens", response.splitter.chunk_overlap);
            println!(
                "    char budget: {} chars ({} overlap)",
                response.splitter.max_chars, response.splitter.overlap_chars
            );
            println!("    min_chunk_size: {}", response.splitter.min_chunk_size);
            println!("    strategy: {}", response.splitter.strategy);
            println!(
                "    sentence_terminator: {:?}",
                response.splitter.sentence_terminator
            );
            println!("  paths:");
            println!("    input_dir: {}", response.paths.input_dir);
            println!("    processed_dir: {}", response.paths.processed_dir);
            println!("    output_dir: {}", response.paths.output_dir);
            println!("  extraction:");
            println!("    model: {}", response.extraction.model);
            println!("    temperature: {}", response.extraction.temperature);
            println!(
                "    max_concurrent_chunks: {}",
                response.extraction.max_concurrent_chunks
            );
            if let Some(template) = &response.extraction.prompt_template {
                println!("    prompt_template:");
                for line in template.lines() {
                    println!("      {line}");
                }
            }
            println!("  validation:");
            println!("    limit: {}", response.validation_limit);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
