// Directory chunking through the service container

use crate::common::{assert_chunk_invariants, create_test_services, sentence_splitter, Corpus, SampleText};
use kgsplit::core::pipeline::{chunk_documents, ChunkingPipeline};
use kgsplit::core::splitter::TextSplitter;
use std::path::PathBuf;

#[tokio::test]
async fn test_chunk_processed_directory() {
    let corpus = Corpus::processed();
    let services = create_test_services(corpus.path());

    let (docs, stats) = services
        .create_pipeline()
        .chunk_directory(&corpus.path().join("processed"))
        .await;

    assert_eq!(stats.documents_chunked, 3);
    assert_eq!(stats.documents_skipped, 0);
    assert_eq!(stats.chunks_created, 3);

    let names: Vec<String> = docs
        .iter()
        .map(|d| d.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["manual.txt", "short.txt", "wing.txt"]);

    let short = &docs[1];
    assert_eq!(short.chunks[0].text, SampleText::SHORT);
    assert_eq!(short.total_chars, SampleText::SHORT.chars().count());
}

#[tokio::test]
async fn test_chunk_directory_with_small_budget() {
    let corpus = Corpus::processed();
    let services = create_test_services(corpus.path());
    let pipeline = ChunkingPipeline::new((*services.loader).clone(), sentence_splitter(60, 0.2));

    let (docs, stats) = pipeline
        .chunk_directory(&corpus.path().join("processed"))
        .await;

    assert!(stats.chunks_created > docs.len());
    let wing = docs.iter().find(|d| d.source.ends_with("wing.txt")).unwrap();
    let text = std::fs::read_to_string(&wing.source).unwrap();
    assert!(wing.chunks.len() > 1);
    assert_chunk_invariants(&text, &wing.chunks, 60);
}

#[tokio::test]
async fn test_chunk_missing_directory() {
    let corpus = Corpus::with_files(&[]);
    let services = create_test_services(corpus.path());

    let (docs, stats) = services
        .create_pipeline()
        .chunk_directory(&corpus.path().join("nowhere"))
        .await;

    assert!(docs.is_empty());
    assert_eq!(stats.documents_chunked, 0);
}

#[tokio::test]
async fn test_parallel_matches_sequential() {
    let splitter = sentence_splitter(50, 0.25);
    let docs: Vec<(PathBuf, String)> = (1..=6)
        .map(|i| {
            (
                PathBuf::from(format!("doc{i}.txt")),
                SampleText::cjk_paragraphs(i, 4 + i),
            )
        })
        .collect();

    let parallel = chunk_documents(&splitter, docs.clone()).await;

    assert_eq!(parallel.len(), docs.len());
    for ((source, text), chunked) in docs.iter().zip(&parallel) {
        assert_eq!(&chunked.source, source);
        assert_eq!(chunked.chunks, splitter.split(text));
    }
}

#[test]
fn test_split_text_file() {
    let text = SampleText::latin_paragraphs(2, 6);
    let corpus = Corpus::with_files(&[("doc.txt", text.as_str())]);
    let chunks = TextSplitter::default()
        .split_text_file(corpus.path().join("doc.txt"))
        .unwrap();
    assert_eq!(chunks.len(), 1);

    let err = TextSplitter::default()
        .split_text_file(corpus.path().join("missing.txt"))
        .unwrap_err();
    assert!(err.is_not_found());
}
