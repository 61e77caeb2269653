//! Tests for the save-triplets command

use crate::common::{create_test_services, Corpus};
use kgsplit::cli::commands::save::{execute, SaveArgs};
use kgsplit::cli::OutputFormat;
use kgsplit::core::saver::KgSaver;
use kgsplit::core::types::RawTriplet;

const RESPONSE: &str = r#"{"triplets": [
    {"subject": "机翼", "subject_type": "部件", "relation_type": "属于",
     "object": "飞机", "object_type": "飞行器", "evidence": "机翼是飞机的部件"},
    {"subject": "襟翼", "relation_type": "", "object": "机翼"}
]}"#;

#[tokio::test]
async fn test_save_from_response_file() {
    let corpus = Corpus::with_files(&[("response.json", RESPONSE)]);
    let services = create_test_services(corpus.path());
    let out = corpus.path().join("out");

    let args = SaveArgs {
        input: Some(corpus.path().join("response.json")),
        document: None,
        output_dir: Some(out.clone()),
    };
    execute(args, &services, OutputFormat::Json).await.unwrap();

    let csv = std::fs::read_to_string(out.join("triplets.csv")).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains(",机翼,部件,属于,飞机,飞行器,机翼是飞机的部件"));
}

#[tokio::test]
async fn test_save_from_raw_triplets() {
    let corpus = Corpus::with_files(&[]);
    let services = create_test_services(corpus.path());

    // Without an input file the document's raw file is used
    let saver = KgSaver::new(services.document_output_dir("wing")).unwrap();
    saver
        .save_raw(&[RawTriplet {
            subject: "Flap".to_string(),
            relation_type: "part of".to_string(),
            object: "Wing".to_string(),
            ..Default::default()
        }])
        .unwrap();

    let args = SaveArgs {
        input: None,
        document: Some("wing".to_string()),
        output_dir: None,
    };
    execute(args, &services, OutputFormat::Human).await.unwrap();

    assert!(saver.csv_path().exists());
}

#[tokio::test]
async fn test_save_nothing_complete() {
    let corpus = Corpus::with_files(&[("empty.json", "[]")]);
    let services = create_test_services(corpus.path());
    let out = corpus.path().join("out");

    let args = SaveArgs {
        input: Some(corpus.path().join("empty.json")),
        document: None,
        output_dir: Some(out.clone()),
    };
    execute(args, &services, OutputFormat::Human).await.unwrap();

    assert!(!out.join("triplets.csv").exists());
}

#[tokio::test]
async fn test_save_malformed_input() {
    let corpus = Corpus::with_files(&[("bad.json", "not json")]);
    let services = create_test_services(corpus.path());

    let args = SaveArgs {
        input: Some(corpus.path().join("bad.json")),
        document: None,
        output_dir: Some(corpus.path().join("out")),
    };
    assert!(execute(args, &services, OutputFormat::Human).await.is_err());
}

#[tokio::test]
async fn test_save_by_document_is_validated() {
    let corpus = Corpus::with_files(&[
        ("response.json", RESPONSE),
        ("processed/wing.txt", "机翼是飞机的部件。"),
    ]);
    let services = create_test_services(corpus.path());

    let args = SaveArgs {
        input: Some(corpus.path().join("response.json")),
        document: Some("wing".to_string()),
        output_dir: None,
    };
    execute(args, &services, OutputFormat::Human).await.unwrap();
    assert!(corpus.path().join("output/wing/triplets.csv").exists());
    assert!(corpus.path().join("output/wing/raw_triplets.json").exists());

    // Only the complete triplet is kept, under the document's name
    let report = services.create_validator(None).validate_all().unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.valid, 1);
    assert_eq!(report.details[0].document, "wing");
}

#[tokio::test]
async fn test_save_requires_destination() {
    let corpus = Corpus::with_files(&[("response.json", RESPONSE)]);
    let services = create_test_services(corpus.path());

    let args = SaveArgs {
        input: Some(corpus.path().join("response.json")),
        document: None,
        output_dir: None,
    };
    assert!(execute(args, &services, OutputFormat::Human).await.is_err());
    assert!(!corpus.path().join("output").exists());
}
