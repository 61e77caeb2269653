//! Split command - chunk a document or a directory of documents

use crate::cli::output::{colors, format_duration, preview};
use crate::cli::OutputFormat;
use crate::core::pipeline::ChunkingPipeline;
use crate::core::services::Services;
use crate::core::splitter::{Strategy, TextSplitter};
use crate::core::types::{ChunkStats, DocumentChunks};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Chars of chunk text shown per line in human output
const PREVIEW_CHARS: usize = 40;

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Text file, or directory of text files, to split
    pub path: PathBuf,

    /// Splitting strategy (sentence or paragraph)
    #[arg(long, short = 's')]
    pub strategy: Option<Strategy>,

    /// Maximum estimated tokens per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between chunks, in estimated tokens
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Documents up to this many chars stay a single chunk
    #[arg(long)]
    pub min_chunk_size: Option<usize>,

    /// Write the chunks as JSON to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl SplitArgs {
    fn has_overrides(&self) -> bool {
        self.strategy.is_some()
            || self.chunk_size.is_some()
            || self.chunk_overlap.is_some()
            || self.min_chunk_size.is_some()
    }
}

/// Split result response
#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub path: String,
    pub strategy: Strategy,
    pub max_chars: usize,
    pub overlap_chars: usize,
    pub stats: ChunkStats,
    pub documents: Vec<DocumentChunks>,
}

/// Execute the split command
pub async fn execute(
    args: SplitArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.path.exists() {
        return Err(format!(
            "Path '{}' does not exist. Provide a text file or a directory of text files.",
            args.path.display()
        )
        .into());
    }

    let splitter = build_splitter(&args, services)?;
    let settings = splitter.settings().clone();
    let pipeline = ChunkingPipeline::new((*services.loader).clone(), splitter);

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Splitting {} by {} (max {} chars, {} overlap)...",
            colors::file_path(&args.path.display().to_string()),
            settings.strategy(),
            colors::number(&settings.max_chars().to_string()),
            colors::number(&settings.overlap_chars().to_string())
        );
    }

    let (documents, stats) = if args.path.is_dir() {
        pipeline.chunk_directory(&args.path).await
    } else {
        let start = Instant::now();
        let doc = pipeline.chunk_file(&args.path)?;
        let stats = ChunkStats {
            documents_chunked: 1,
            documents_skipped: 0,
            chunks_created: doc.chunks.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        (vec![doc], stats)
    };

    let response = SplitResponse {
        path: args.path.to_string_lossy().into_owned(),
        strategy: settings.strategy(),
        max_chars: settings.max_chars(),
        overlap_chars: settings.overlap_chars(),
        stats,
        documents,
    };

    if let Some(output) = &args.output {
        fs::write(output, serde_json::to_string_pretty(&response.documents)?)?;
    }

    match format {
        OutputFormat::Human => print_human(&response, args.output.as_ref()),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn build_splitter(
    args: &SplitArgs,
    services: &Services,
) -> Result<TextSplitter, Box<dyn std::error::Error>> {
    if !args.has_overrides() {
        return Ok((*services.splitter).clone());
    }

    let mut config = (*services.config).clone();
    if let Some(strategy) = args.strategy {
        config.splitter.strategy = strategy;
    }
    if let Some(size) = args.chunk_size {
        config.splitter.chunk_size = size;
    }
    if let Some(overlap) = args.chunk_overlap {
        config.splitter.chunk_overlap = overlap;
    }
    if let Some(min_size) = args.min_chunk_size {
        config.splitter.min_chunk_size = min_size;
    }
    config.validate()?;

    Ok(TextSplitter::new(config.splitter_settings()))
}

fn print_human(response: &SplitResponse, output: Option<&PathBuf>) {
    for doc in &response.documents {
        println!(
            "{} ({} chars, {} chunks)",
            colors::file_path(&doc.source.display().to_string()),
            colors::number(&doc.total_chars.to_string()),
            colors::number(&doc.chunks.len().to_string())
        );
        for chunk in &doc.chunks {
            println!(
                "  {}  ~{} tokens  {} chars  {}  {}",
                colors::chunk_id(&chunk.id),
                colors::number(&chunk.size_estimate.to_string()),
                chunk.text.chars().count(),
                colors::dim(&format!("[{}:{}]", chunk.start_char, chunk.end_char)),
                preview(&chunk.text, PREVIEW_CHARS)
            );
        }
    }

    let stats = &response.stats;
    println!(
        "{} {} documents ({} chunks) in {}",
        colors::success("Split"),
        colors::number(&stats.documents_chunked.to_string()),
        colors::number(&stats.chunks_created.to_string()),
        colors::number(&format_duration(stats.duration_ms as f64 / 1000.0))
    );
    if stats.documents_skipped > 0 {
        println!(
            "{} {} documents could not be read",
            colors::warning("Skipped"),
            stats.documents_skipped
        );
    }
    if let Some(path) = output {
        println!(
            "Chunks written to {}",
            colors::file_path(&path.display().to_string())
        );
    }
}
