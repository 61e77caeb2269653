// Extraction, persistence and validation over a chunked document

use crate::common::{create_test_services, sentence_splitter, Corpus, SampleText};
use async_trait::async_trait;
use kgsplit::core::error::{KgError, Result};
use kgsplit::core::extract::{ExtractionPipeline, TripletExtractor};
use kgsplit::core::pipeline::ChunkingPipeline;
use kgsplit::core::saver::KgSaver;
use kgsplit::core::types::Verdict;
use kgsplit::core::validate::TripletValidator;

/// Answers every prompt with one grounded and one invented triplet
struct FixedExtractor;

#[async_trait]
impl TripletExtractor for FixedExtractor {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if prompt.is_empty() {
            return Err(KgError::ExtractionFailed("empty prompt".to_string()));
        }
        Ok(r#"```json
{"triplets": [
  {"subject": "机翼", "subject_type": "部件", "relation_type": "产生",
   "object": "升力", "object_type": "物理量", "evidence": "机翼是飞机产生升力的主要部件"},
  {"subject": "燃油", "subject_type": "物质", "relation_type": "存放于",
   "object": "油箱", "object_type": "部件", "evidence": "燃油存放在油箱中"},
  {"subject": "尾翼", "relation_type": "", "object": "飞机"}
]}
```"#
            .to_string())
    }
}

/// Finds nothing in chunks mentioning unrelated content
struct SelectiveExtractor;

#[async_trait]
impl TripletExtractor for SelectiveExtractor {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if prompt.contains("无关") {
            return Ok("[]".to_string());
        }
        FixedExtractor.complete(prompt).await
    }
}

#[tokio::test]
async fn test_extract_save_validate() {
    let source = SampleText::cjk_paragraphs(3, 8);
    let corpus = Corpus::with_files(&[("processed/wing.txt", source.as_str())]);
    let services = create_test_services(corpus.path());

    // Chunk
    let text = std::fs::read_to_string(corpus.path().join("processed/wing.txt")).unwrap();
    let chunks = sentence_splitter(60, 0.2).split_text(&text);
    assert!(chunks.len() > 1);

    // Extract
    let pipeline = ExtractionPipeline::new(FixedExtractor, &services.config.extraction);
    let outcome = pipeline.run(&chunks).await;
    assert_eq!(outcome.chunks_succeeded, chunks.len());
    assert_eq!(outcome.chunks_failed, 0);
    assert_eq!(outcome.incomplete_dropped, chunks.len());
    assert_eq!(outcome.triplets.len(), chunks.len() * 2);

    // Save
    let saver = KgSaver::new(corpus.path().join("output/wing")).unwrap();
    saver.save_raw(&outcome.triplets).unwrap();
    let saved = saver.save_triplets(&outcome.triplets).unwrap();
    assert_eq!(saved, chunks.len() * 2);
    let csv = std::fs::read_to_string(saver.csv_path()).unwrap();
    assert_eq!(csv.lines().count(), saved + 1);

    // Validate
    let validator = services.create_validator(None);
    let report = validator.validate_all().unwrap();
    assert_eq!(report.total, chunks.len() * 2);
    assert_eq!(report.valid, chunks.len());
    assert_eq!(report.accuracy(), 50.0);
    assert!(report.failures().all(|d| d.verdict == Verdict::NotFound));

    let report_path = corpus.path().join("output/validation_report.json");
    validator.save_report(&report, &report_path).unwrap();
    assert!(report_path.exists());
}

#[tokio::test]
async fn test_validation_limit_per_document() {
    let corpus = Corpus::with_files(&[
        ("processed/a.txt", SampleText::SHORT),
        ("processed/b.txt", SampleText::SHORT),
    ]);
    let services = create_test_services(corpus.path());

    let triplets = ExtractionPipeline::new(FixedExtractor, &services.config.extraction)
        .run(&sentence_splitter(60, 0.0).split_text(&SampleText::cjk_paragraphs(2, 6)))
        .await
        .triplets;
    assert!(triplets.len() > 3);

    for doc in ["a", "b"] {
        KgSaver::new(corpus.path().join("output").join(doc))
            .unwrap()
            .save_raw(&triplets)
            .unwrap();
    }

    let report = TripletValidator::new(
        corpus.path().join("output"),
        corpus.path().join("processed"),
        3,
    )
    .validate_all()
    .unwrap();

    assert_eq!(report.total, 6);
    assert_eq!(report.details[0].document, "a");
    assert_eq!(report.details[5].document, "b");
}

#[tokio::test]
async fn test_extract_documents_into_output_layout() {
    let wing = SampleText::cjk_paragraphs(3, 8);
    let corpus = Corpus::with_files(&[
        ("processed/notes.txt", "无关内容。"),
        ("processed/wing.txt", wing.as_str()),
    ]);
    let services = create_test_services(corpus.path());

    let chunker = ChunkingPipeline::new((*services.loader).clone(), sentence_splitter(60, 0.2));
    let (docs, _) = chunker
        .chunk_directory(&services.config.paths.processed_dir)
        .await;
    assert_eq!(docs.len(), 2);
    let wing_chunks = docs[1].chunks.len();

    let extraction = ExtractionPipeline::new(SelectiveExtractor, &services.config.extraction);
    let results = extraction
        .extract_documents(&docs, &services.config.paths.output_dir)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].document, "notes");
    assert_eq!(results[0].saved, 0);
    assert!(!results[0].output_dir.exists());

    assert_eq!(results[1].document, "wing");
    assert_eq!(results[1].saved, wing_chunks * 2);
    assert!(results[1].output_dir.join("raw_triplets.json").exists());
    assert!(results[1].output_dir.join("triplets.csv").exists());

    // The validator finds the saved document under its own name
    let report = services.create_validator(None).validate_all().unwrap();
    assert_eq!(report.total, wing_chunks * 2);
    assert_eq!(report.valid, wing_chunks);
    assert!(report.details.iter().all(|d| d.document == "wing"));
}
