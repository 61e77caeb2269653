//! Triplet extraction over chunks.
//!
//! The language model itself sits behind [`TripletExtractor`]; this
//! module builds the prompt, parses whatever the model answers and
//! drives one request per chunk. A chunk whose request or response
//! fails is logged and skipped, never aborting the batch.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, Span};

use crate::core::config::ExtractionConfig;
use crate::core::error::{KgError, Result};
use crate::core::saver::KgSaver;
use crate::core::types::{Chunk, DocumentChunks, RawTriplet};

/// Placeholder replaced by the chunk text in prompt templates
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// A structured-extraction backend (typically a chat-completion API)
#[async_trait]
pub trait TripletExtractor: Send + Sync {
    /// Send one prompt and return the raw content of the reply
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Fill the chunk text into a prompt template
pub fn build_prompt(template: &str, text: &str) -> String {
    template.replace(TEXT_PLACEHOLDER, text)
}

/// Parse a model reply into triplet candidates.
///
/// Accepts `{"triplets": [...]}` or a bare array, optionally wrapped
/// in a Markdown code fence. Any other JSON shape yields no triplets;
/// entries that are not triplet objects are dropped.
///
/// # Errors
///
/// [`KgError::MalformedResponse`] if the reply is not JSON at all.
pub fn parse_response(content: &str) -> Result<Vec<RawTriplet>> {
    let body = strip_code_fence(content);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| KgError::MalformedResponse(format!("{e}: {}", preview(body))))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("triplets") {
            Some(Value::Array(items)) => items,
            _ => {
                let keys: Vec<&String> = map.keys().collect();
                tracing::warn!("Unexpected JSON structure, keys: {:?}", keys);
                return Ok(Vec::new());
            }
        },
        other => {
            tracing::warn!("Unexpected JSON value: {}", preview(&other.to_string()));
            return Ok(Vec::new());
        }
    };

    let triplets = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawTriplet>(item) {
            Ok(triplet) => Some(triplet),
            Err(e) => {
                tracing::debug!("Dropping malformed triplet entry: {}", e);
                None
            }
        })
        .collect();

    Ok(triplets)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line
    let inner = inner.split_once('\n').map_or("", |(_, rest)| rest);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn preview(text: &str) -> String {
    let head: String = text.chars().take(200).collect();
    if head.len() < text.len() {
        format!("{head}...")
    } else {
        head
    }
}

/// Result of running extraction over a document's chunks
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    /// Complete triplets, in chunk order
    pub triplets: Vec<RawTriplet>,

    /// Chunks that produced a usable response
    pub chunks_succeeded: usize,

    /// Chunks skipped because the request or parse failed
    pub chunks_failed: usize,

    /// Candidates dropped for missing subject, relation or object
    pub incomplete_dropped: usize,
}

/// Extraction result of one document, as saved on disk
#[derive(Debug, Clone)]
pub struct DocumentTriplets {
    /// Document name (source file stem)
    pub document: String,

    /// `<output_root>/<document>`, written only when triplets were found
    pub output_dir: PathBuf,

    pub outcome: ExtractionOutcome,

    /// Rows written to `triplets.csv`
    pub saved: usize,
}

/// Sends every chunk of a document to a [`TripletExtractor`]
pub struct ExtractionPipeline<E> {
    extractor: Arc<E>,
    prompt_template: String,
    max_concurrent: usize,
    span: Span,
}

impl<E: TripletExtractor + 'static> ExtractionPipeline<E> {
    pub fn new(extractor: E, config: &ExtractionConfig) -> Self {
        Self {
            extractor: Arc::new(extractor),
            prompt_template: config.prompt_template.clone(),
            max_concurrent: config.max_concurrent_chunks.max(1),
            span: tracing::info_span!("extraction", model = %config.model),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Extract triplets from every chunk.
    ///
    /// Up to `max_concurrent_chunks` requests are in flight at once;
    /// results are put back in chunk order regardless of completion
    /// order.
    pub async fn run(&self, chunks: &[Chunk]) -> ExtractionOutcome {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let extractor = Arc::clone(&self.extractor);
            let semaphore = Arc::clone(&semaphore);
            let prompt = build_prompt(&self.prompt_template, &chunk.text);
            let chunk_id = chunk.id.clone();

            tasks.spawn(
                async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    let result = match extractor.complete(&prompt).await {
                        Ok(content) => parse_response(&content),
                        Err(e) => Err(e),
                    };
                    (idx, chunk_id, result)
                }
                .instrument(self.span.clone()),
            );
        }

        let mut results = Vec::with_capacity(chunks.len());
        let mut outcome = ExtractionOutcome::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    self.span
                        .in_scope(|| tracing::error!("Extraction task failed: {}", e));
                    outcome.chunks_failed += 1;
                }
            }
        }
        results.sort_by_key(|(idx, _, _)| *idx);

        let _enter = self.span.enter();
        let total = chunks.len();
        for (idx, chunk_id, result) in results {
            match result {
                Ok(candidates) => {
                    let found = candidates.len();
                    let complete: Vec<RawTriplet> =
                        candidates.into_iter().filter(RawTriplet::is_complete).collect();
                    tracing::info!(
                        "Chunk {}/{} ({}): {} valid triplets",
                        idx + 1,
                        total,
                        chunk_id,
                        complete.len()
                    );
                    outcome.incomplete_dropped += found - complete.len();
                    outcome.chunks_succeeded += 1;
                    outcome.triplets.extend(complete);
                }
                Err(e) => {
                    tracing::warn!("Skipping chunk {} ({}): {}", idx + 1, chunk_id, e);
                    outcome.chunks_failed += 1;
                }
            }
        }

        tracing::info!(
            "Extraction finished: {} triplets from {}/{} chunks",
            outcome.triplets.len(),
            outcome.chunks_succeeded,
            total
        );
        outcome
    }

    /// Extract a chunked document and save its triplets.
    ///
    /// Complete triplets go to `<output_root>/<document>/raw_triplets.json`
    /// and `triplets.csv`, the layout the validator reads. A document
    /// that yields no triplets writes nothing.
    pub async fn extract_document(
        &self,
        document: &DocumentChunks,
        output_root: &Path,
    ) -> Result<DocumentTriplets> {
        let name = document
            .source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                KgError::InvalidPath(format!("No document name in {:?}", document.source))
            })?;
        let output_dir = output_root.join(&name);

        let outcome = self.run(&document.chunks).await;
        if outcome.triplets.is_empty() {
            self.span
                .in_scope(|| tracing::warn!("No triplets extracted from {}", name));
            return Ok(DocumentTriplets {
                document: name,
                output_dir,
                outcome,
                saved: 0,
            });
        }

        let saver = KgSaver::new(&output_dir)?.with_span(self.span.clone());
        saver.save_raw(&outcome.triplets)?;
        let saved = saver.save_triplets(&outcome.triplets)?;

        Ok(DocumentTriplets {
            document: name,
            output_dir,
            outcome,
            saved,
        })
    }

    /// Extract and save every document in turn.
    ///
    /// A document whose output cannot be written is logged and skipped.
    pub async fn extract_documents(
        &self,
        documents: &[DocumentChunks],
        output_root: &Path,
    ) -> Vec<DocumentTriplets> {
        let mut results = Vec::with_capacity(documents.len());
        for (idx, document) in documents.iter().enumerate() {
            self.span.in_scope(|| {
                tracing::info!(
                    "Processing document {}/{}: {:?}",
                    idx + 1,
                    documents.len(),
                    document.source
                )
            });
            match self.extract_document(document, output_root).await {
                Ok(result) => results.push(result),
                Err(e) => self.span.in_scope(|| {
                    tracing::warn!("Skipping {:?}: {}", document.source, e)
                }),
            }
        }
        results
    }
}
