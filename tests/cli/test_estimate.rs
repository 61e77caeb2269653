//! Tests for the estimate command

use crate::common::{create_test_services, Corpus};
use kgsplit::cli::commands::estimate::{execute, EstimateArgs};
use kgsplit::cli::OutputFormat;

#[tokio::test]
async fn test_estimate_inline_text() {
    let corpus = Corpus::with_files(&[]);
    let services = create_test_services(corpus.path());

    let args = EstimateArgs {
        text: Some("机翼产生升力".to_string()),
        file: None,
    };
    assert!(execute(args, &services, OutputFormat::Json).await.is_ok());
}

#[tokio::test]
async fn test_estimate_file() {
    let corpus = Corpus::with_files(&[("doc.txt", "The wing produces lift.")]);
    let services = create_test_services(corpus.path());

    let args = EstimateArgs {
        text: None,
        file: Some(corpus.path().join("doc.txt")),
    };
    assert!(execute(args, &services, OutputFormat::Human).await.is_ok());
}

#[tokio::test]
async fn test_estimate_missing_file() {
    let corpus = Corpus::with_files(&[]);
    let services = create_test_services(corpus.path());

    let args = EstimateArgs {
        text: None,
        file: Some(corpus.path().join("missing.txt")),
    };
    assert!(execute(args, &services, OutputFormat::Human).await.is_err());
}

#[tokio::test]
async fn test_estimate_requires_input() {
    let corpus = Corpus::with_files(&[]);
    let services = create_test_services(corpus.path());

    let args = EstimateArgs {
        text: None,
        file: None,
    };
    assert!(execute(args, &services, OutputFormat::Human).await.is_err());
}
