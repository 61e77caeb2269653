//! Validate command - check triplet evidence against source text

use crate::cli::output::{colors, preview, print_header, print_output, print_success};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::ValidationReport;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Maximum triplets checked per document (defaults to the configured limit)
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Save the full report as JSON to this file
    #[arg(long, short = 'r')]
    pub report: Option<PathBuf>,

    /// Detail lines shown in human output
    #[arg(long, default_value = "20")]
    pub show: usize,
}

/// Execute the validate command
pub async fn execute(
    args: ValidateArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.limit == Some(0) {
        return Err("Limit must be at least 1.".into());
    }

    let validator = services.create_validator(args.limit);
    let report = validator.validate_all()?;

    if let Some(path) = &args.report {
        validator.save_report(&report, path)?;
    }

    match format {
        OutputFormat::Human => print_report(&report, args.show),
        OutputFormat::Json => print_output(&report, format),
    }

    if let (Some(path), OutputFormat::Human) = (&args.report, format) {
        println!(
            "\nReport saved to {}",
            colors::file_path(&path.display().to_string())
        );
    }

    Ok(())
}

fn print_report(report: &ValidationReport, show: usize) {
    if report.total == 0 {
        println!("No triplets were validated.");
        return;
    }

    print_header("Validation summary");
    let accuracy = report.accuracy();
    println!(
        "  Total:   {}",
        colors::number(&report.total.to_string())
    );
    println!(
        "  Valid:   {} ({:.2}%)",
        colors::success(&report.valid.to_string()),
        accuracy
    );
    println!(
        "  Invalid: {} ({:.2}%)",
        colors::error(&report.invalid.to_string()),
        100.0 - accuracy
    );

    if show > 0 {
        println!();
        print_header(&format!("Details (first {show})"));
        for detail in report.details.iter().take(show) {
            let status = if detail.verdict.is_valid() {
                colors::success("ok")
            } else {
                colors::error("FAIL")
            };
            println!(
                "[{}/{}] {} {}",
                detail.document,
                detail.index,
                status,
                detail.verdict.reason()
            );
            println!(
                "  {} --[{}]--> {}",
                detail.subject, detail.relation, detail.object
            );
            println!("  {}", colors::dim(&preview(&detail.evidence, 100)));
        }
    }

    println!();
    let failures: Vec<_> = report.failures().collect();
    if failures.is_empty() {
        print_success("All validated triplets passed.");
        return;
    }

    print_header(&format!("{} failed triplets", failures.len()));
    for detail in failures.iter().take(10) {
        println!(
            "  [{}/{}] {}: {} -> {}",
            detail.document,
            detail.index,
            detail.verdict.reason(),
            detail.subject,
            detail.object
        );
    }
}
