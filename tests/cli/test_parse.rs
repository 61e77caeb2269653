//! Tests for argument parsing and output helpers

use clap::Parser;
use kgsplit::cli::output::{format_duration, preview};
use kgsplit::cli::{Cli, Commands, LogFormat, OutputFormat};
use kgsplit::core::splitter::Strategy;

#[test]
fn test_parse_split_with_overrides() {
    let cli = Cli::try_parse_from([
        "kgsplit",
        "--format",
        "json",
        "split",
        "data/processed",
        "--strategy",
        "paragraph",
        "--chunk-size",
        "600",
        "--chunk-overlap",
        "100",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.log_format, LogFormat::Text);
    match cli.command {
        Commands::Split(args) => {
            assert_eq!(args.strategy, Some(Strategy::Paragraph));
            assert_eq!(args.chunk_size, Some(600));
            assert_eq!(args.chunk_overlap, Some(100));
            assert!(args.output.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_strategy() {
    let result = Cli::try_parse_from(["kgsplit", "split", "doc.txt", "--strategy", "words"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_estimate_text_and_file_conflict() {
    let result = Cli::try_parse_from(["kgsplit", "estimate", "text", "--file", "doc.txt"]);
    assert!(result.is_err());

    let result = Cli::try_parse_from(["kgsplit", "estimate"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "kgsplit",
        "validate",
        "--limit",
        "50",
        "--log-format",
        "json",
        "--config",
        "kgsplit.toml",
    ])
    .unwrap();

    assert_eq!(cli.log_format, LogFormat::Json);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("kgsplit.toml")));
    match cli.command {
        Commands::Validate(args) => assert_eq!(args.limit, Some(50)),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_save_triplets() {
    let cli = Cli::try_parse_from(["kgsplit", "save-triplets", "-o", "out"]).unwrap();
    match cli.command {
        Commands::SaveTriplets(args) => {
            assert!(args.input.is_none());
            assert!(args.document.is_none());
            assert_eq!(args.output_dir.as_deref(), Some(std::path::Path::new("out")));
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["kgsplit", "save-triplets", "reply.json", "-d", "manual"])
        .unwrap();
    match cli.command {
        Commands::SaveTriplets(args) => assert_eq!(args.document.as_deref(), Some("manual")),
        other => panic!("unexpected command: {other:?}"),
    }

    // One of --document or --output-dir is required
    assert!(Cli::try_parse_from(["kgsplit", "save-triplets", "reply.json"]).is_err());
}

#[test]
fn test_format_duration_ranges() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(2.0), "2.00s");
    assert_eq!(format_duration(125.0), "2m 5.0s");
}

#[test]
fn test_preview_flattens_whitespace() {
    assert_eq!(preview("第一段\n\n第二段", 20), "第一段  第二段");
    assert_eq!(preview("abcdef", 3), "abc...");
}
