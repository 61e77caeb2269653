//! Save-triplets command - persist extracted triplets as CSV

use crate::cli::output::{colors, print_success, print_warning};
use crate::cli::OutputFormat;
use crate::core::extract::parse_response;
use crate::core::loader::read_utf8;
use crate::core::services::Services;
use crate::core::types::RawTriplet;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the save-triplets command
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Triplets JSON (`{"triplets": [...]}` or a list); defaults to
    /// raw_triplets.json in the output directory
    pub input: Option<PathBuf>,

    /// Document name; output goes to `<output_dir>/<document>`, where
    /// `validate` looks for it
    #[arg(long, short = 'd', required_unless_present = "output_dir")]
    pub document: Option<String>,

    /// Exact output directory, overriding the per-document default
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

/// Save result response
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub input: String,
    pub candidates: usize,
    pub saved: usize,
    pub csv_path: Option<String>,
    pub raw_path: Option<String>,
}

/// Execute the save-triplets command
pub async fn execute(
    args: SaveArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = match (&args.output_dir, &args.document) {
        (Some(dir), _) => dir.clone(),
        (None, Some(document)) => services.document_output_dir(document),
        (None, None) => return Err("Provide --document <name> or --output-dir <dir>.".into()),
    };
    let saver = services.create_saver(Some(output_dir.as_path()))?;

    let (input, candidates) = match &args.input {
        Some(path) => (path.clone(), parse_response(&read_utf8(path)?)?),
        None => (saver.raw_path(), saver.load_raw()),
    };

    let complete: Vec<RawTriplet> = candidates
        .iter()
        .filter(|t| t.is_complete())
        .cloned()
        .collect();
    // Keep a raw copy beside the CSV so `validate` picks the document up
    let raw_path = match (&args.input, complete.is_empty()) {
        (Some(_), false) => Some(saver.save_raw(&complete)?),
        _ => None,
    };
    let saved = saver.save_triplets(&complete)?;

    let response = SaveResponse {
        input: input.to_string_lossy().into_owned(),
        candidates: candidates.len(),
        saved,
        csv_path: (saved > 0).then(|| saver.csv_path().to_string_lossy().into_owned()),
        raw_path: raw_path.map(|p| p.to_string_lossy().into_owned()),
    };

    match format {
        OutputFormat::Human => match &response.csv_path {
            Some(path) => {
                print_success(&format!("Saved {} triplets", response.saved));
                println!(
                    "  {} of {} candidates were complete",
                    colors::number(&response.saved.to_string()),
                    colors::number(&response.candidates.to_string())
                );
                println!("  Written to {}", colors::file_path(path));
                if let Some(raw) = &response.raw_path {
                    println!("  Raw triplets in {}", colors::file_path(raw));
                }
            }
            None => print_warning(&format!(
                "No complete triplets in {}, nothing written",
                response.input
            )),
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
