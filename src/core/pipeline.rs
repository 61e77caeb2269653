//! Chunking pipeline orchestration.
//!
//! Coordinates the document side of the workflow:
//! 1. List text documents
//! 2. Read each document
//! 3. Split it into chunks
//!
//! Documents are split on the blocking thread pool, one task per
//! document, and come back in listing order. A document that fails to
//! load is logged and skipped.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task::JoinSet;

use crate::core::error::Result;
use crate::core::loader::DocumentLoader;
use crate::core::splitter::TextSplitter;
use crate::core::types::{ChunkStats, DocumentChunks};

/// Orchestrates loading and splitting of documents
#[derive(Debug, Clone)]
pub struct ChunkingPipeline {
    loader: DocumentLoader,
    splitter: TextSplitter,
}

impl ChunkingPipeline {
    pub fn new(loader: DocumentLoader, splitter: TextSplitter) -> Self {
        Self { loader, splitter }
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    pub fn splitter(&self) -> &TextSplitter {
        &self.splitter
    }

    /// Load and split a single document
    pub fn chunk_file(&self, path: &Path) -> Result<DocumentChunks> {
        let text = self.loader.load_text(path)?;
        Ok(split_document(&self.splitter, path.to_path_buf(), &text))
    }

    /// Chunk every document under `root` and return chunks + stats
    pub async fn chunk_directory(&self, root: &Path) -> (Vec<DocumentChunks>, ChunkStats) {
        let start = Instant::now();
        let files = self.loader.list_documents(root);
        tracing::info!("Chunking {} documents from {:?}", files.len(), root);

        let mut tasks = JoinSet::new();
        for (idx, path) in files.into_iter().enumerate() {
            let pipeline = self.clone();
            tasks.spawn_blocking(move || {
                let result = pipeline.chunk_file(&path);
                (idx, path, result)
            });
        }

        let mut results = Vec::new();
        let mut stats = ChunkStats::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("Chunking task failed: {}", e);
                    stats.documents_skipped += 1;
                }
            }
        }
        results.sort_by_key(|(idx, _, _)| *idx);

        let mut documents = Vec::with_capacity(results.len());
        for (_, path, result) in results {
            match result {
                Ok(doc) => {
                    tracing::debug!("Chunked {:?} ({} chunks)", path, doc.chunks.len());
                    stats.chunks_created += doc.chunks.len();
                    stats.documents_chunked += 1;
                    documents.push(doc);
                }
                Err(e) => {
                    tracing::warn!("Failed to chunk {:?}: {}", path, e);
                    stats.documents_skipped += 1;
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Chunking complete: {} documents chunked, {} skipped, {} chunks created in {}ms",
            stats.documents_chunked,
            stats.documents_skipped,
            stats.chunks_created,
            stats.duration_ms
        );

        (documents, stats)
    }
}

/// Split already-loaded documents in parallel, preserving input order
pub async fn chunk_documents(
    splitter: &TextSplitter,
    documents: Vec<(PathBuf, String)>,
) -> Vec<DocumentChunks> {
    let mut tasks = JoinSet::new();
    for (idx, (source, text)) in documents.into_iter().enumerate() {
        let splitter = splitter.clone();
        tasks.spawn_blocking(move || (idx, split_document(&splitter, source, &text)));
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => tracing::error!("Chunking task failed: {}", e),
        }
    }
    results.sort_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, doc)| doc).collect()
}

fn split_document(splitter: &TextSplitter, source: PathBuf, text: &str) -> DocumentChunks {
    DocumentChunks {
        source,
        total_chars: text.chars().count(),
        chunks: splitter.split(text),
    }
}
