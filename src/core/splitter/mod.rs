//! Token-budgeted text chunking.
//!
//! Splits a document into ordered, overlapping chunks whose size
//! is bounded by a character budget derived from a token budget:
//!
//! - **estimator**: character-class token estimate
//! - **segment**: sentence and paragraph segmentation with offsets
//! - **overlap**: trailing-unit selection that seeds the next chunk
//! - **window**: the greedy packing loop shared by both strategies
//!
//! The engine is pure and synchronous. It never fails: degenerate
//! input degrades to fewer, larger chunks, and every non-empty
//! document yields at least one chunk.
//!
//! # Example
//!
//! ```
//! use kgsplit::core::splitter::{SplitterSettings, TextSplitter};
//!
//! let settings = SplitterSettings::new(40).with_overlap_ratio(0.25);
//! let splitter = TextSplitter::new(settings);
//!
//! let text = "机翼是飞机产生升力的主要部件之一。".repeat(8);
//! let chunks = splitter.split_text(&text);
//!
//! assert!(chunks.len() > 1);
//! assert_eq!(chunks[0].id, "chunk_001");
//! ```

pub mod estimator;
pub mod overlap;
pub mod segment;
pub mod window;

pub use estimator::{estimate_tokens, CharClass};
pub use overlap::select_overlap;
pub use segment::{split_paragraphs, split_sentences, Segment, TextUnit};
pub use window::{ChunkSink, Joiner, Window};

use crate::core::error::Result;
use crate::core::loader::read_utf8;
use crate::core::types::Chunk;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::Span;

/// Average characters per estimated token, used to turn the token
/// budget into a character budget
pub const CHARS_PER_TOKEN: f64 = 1.5;

/// Which units the windowing loop packs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Pack sentences (primary)
    #[default]
    Sentence,
    /// Pack paragraphs, re-packing oversized ones by sentence
    Paragraph,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sentence => write!(f, "sentence"),
            Strategy::Paragraph => write!(f, "paragraph"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentence" | "sentences" => Ok(Strategy::Sentence),
            "paragraph" | "paragraphs" => Ok(Strategy::Paragraph),
            other => Err(format!(
                "unknown strategy '{other}' (expected 'sentence' or 'paragraph')"
            )),
        }
    }
}

/// Budget and behaviour of a [`TextSplitter`]
#[derive(Debug, Clone, PartialEq)]
pub struct SplitterSettings {
    max_chars: usize,
    overlap_ratio: f64,
    min_chunk_size: usize,
    strategy: Strategy,
    sentence_terminator: String,
}

impl SplitterSettings {
    /// Settings with a character budget and no overlap
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            overlap_ratio: 0.0,
            min_chunk_size: 100,
            strategy: Strategy::Sentence,
            sentence_terminator: "。".to_string(),
        }
    }

    /// Settings from a token budget and an overlap in tokens.
    ///
    /// The character budget is `max_tokens / CHARS_PER_TOKEN` and the
    /// overlap becomes a ratio of the token budget.
    pub fn from_token_budget(max_tokens: usize, overlap_tokens: usize) -> Self {
        let max_chars = (max_tokens as f64 / CHARS_PER_TOKEN) as usize;
        let ratio = if max_tokens == 0 {
            0.0
        } else {
            overlap_tokens as f64 / max_tokens as f64
        };

        Self::new(max_chars).with_overlap_ratio(ratio)
    }

    /// Overlap as a fraction of the budget, clamped to `0.0..=1.0`
    pub fn with_overlap_ratio(mut self, ratio: f64) -> Self {
        self.overlap_ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn with_min_chunk_size(mut self, chars: usize) -> Self {
        self.min_chunk_size = chars;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_sentence_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.sentence_terminator = terminator.into();
        self
    }

    /// Character budget per chunk
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn overlap_ratio(&self) -> f64 {
        self.overlap_ratio
    }

    /// Target overlap in characters (`max_chars * overlap_ratio`)
    pub fn overlap_chars(&self) -> usize {
        (self.max_chars as f64 * self.overlap_ratio) as usize
    }

    pub fn min_chunk_size(&self) -> usize {
        self.min_chunk_size
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn sentence_terminator(&self) -> &str {
        &self.sentence_terminator
    }
}

impl Default for SplitterSettings {
    fn default() -> Self {
        Self::from_token_budget(4096, 200)
    }
}

/// Splits documents into chunks.
///
/// Holds no per-document state: the same splitter can be shared
/// across threads and reused for any number of documents.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    settings: SplitterSettings,
    span: Span,
}

impl TextSplitter {
    /// Create a splitter that logs under its own `text_splitter` span
    pub fn new(settings: SplitterSettings) -> Self {
        Self {
            settings,
            span: tracing::info_span!("text_splitter"),
        }
    }

    /// Log under the given span instead
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn settings(&self) -> &SplitterSettings {
        &self.settings
    }

    /// Estimate the token count of `text`
    pub fn estimate_tokens(&self, text: &str) -> usize {
        estimate_tokens(text)
    }

    /// Split with the configured strategy
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        match self.settings.strategy {
            Strategy::Sentence => self.split_text(text),
            Strategy::Paragraph => self.split_text_by_paragraphs(text),
        }
    }

    /// Split by sentences.
    ///
    /// Documents no longer than `min_chunk_size` characters come back
    /// as a single chunk spanning the whole text.
    pub fn split_text(&self, text: &str) -> Vec<Chunk> {
        let _enter = self.span.enter();
        let total_chars = text.chars().count();
        tracing::info!("Splitting text by sentences ({} chars)", total_chars);

        if let Some(chunk) = self.short_document(text, total_chars) {
            return vec![chunk];
        }

        let sentences = split_sentences(text);
        tracing::debug!("Segmented into {} sentences", sentences.len());
        if sentences.is_empty() {
            tracing::warn!("No sentences found, keeping the document as one chunk");
            return vec![whole_document(text, total_chars)];
        }

        let mut sink = ChunkSink::new();
        self.pack_sentences(sentences, &mut sink);

        let chunks = sink.into_chunks();
        self.log_summary(&chunks);
        chunks
    }

    /// Split by paragraphs.
    ///
    /// A paragraph longer than the budget is packed on its own,
    /// sentence by sentence, after flushing the paragraphs gathered
    /// so far. No overlap is carried into or out of it.
    pub fn split_text_by_paragraphs(&self, text: &str) -> Vec<Chunk> {
        let _enter = self.span.enter();
        let total_chars = text.chars().count();
        tracing::info!("Splitting text by paragraphs ({} chars)", total_chars);

        if let Some(chunk) = self.short_document(text, total_chars) {
            return vec![chunk];
        }

        let paragraphs = split_paragraphs(text);
        tracing::debug!("Segmented into {} paragraphs", paragraphs.len());
        if paragraphs.is_empty() {
            tracing::warn!("No paragraphs found, keeping the document as one chunk");
            return vec![whole_document(text, total_chars)];
        }

        let max_chars = self.settings.max_chars();
        let mut sink = ChunkSink::new();
        let mut window = Window::new(max_chars, self.settings.overlap_chars(), Joiner::paragraphs());

        for paragraph in paragraphs {
            if paragraph.char_len() > max_chars {
                window.flush_unseeded(&mut sink);
                tracing::debug!(
                    "Paragraph at char {} exceeds budget ({} > {}), packing by sentence",
                    paragraph.start_char(),
                    paragraph.char_len(),
                    max_chars
                );
                self.pack_oversized_paragraph(paragraph, &mut sink);
                continue;
            }

            window.push(paragraph, &mut sink);
        }
        window.finish(&mut sink);

        let chunks = sink.into_chunks();
        self.log_summary(&chunks);
        chunks
    }

    /// Read a UTF-8 text file and split it with the configured strategy
    pub fn split_text_file(&self, path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
        let path = path.as_ref();
        let text = read_utf8(path)?;
        self.span.in_scope(|| {
            tracing::info!("Read {:?} ({} chars)", path, text.chars().count());
        });
        Ok(self.split(&text))
    }

    fn pack_sentences(&self, sentences: Vec<Segment<'_>>, sink: &mut ChunkSink) {
        let mut window = Window::new(
            self.settings.max_chars(),
            self.settings.overlap_chars(),
            Joiner::sentences(&self.settings.sentence_terminator),
        );
        for sentence in sentences {
            window.push(sentence, sink);
        }
        window.finish(sink);
    }

    fn pack_oversized_paragraph(&self, paragraph: Segment<'_>, sink: &mut ChunkSink) {
        let sentences: Vec<Segment<'_>> = split_sentences(paragraph.as_str())
            .into_iter()
            .map(|s| s.shifted(paragraph.start_char()))
            .collect();

        if sentences.is_empty() {
            // Nothing but terminators: keep it whole
            sink.emit(&[paragraph], &Joiner::paragraphs());
            return;
        }

        self.pack_sentences(sentences, sink);
    }

    fn short_document(&self, text: &str, total_chars: usize) -> Option<Chunk> {
        if total_chars > self.settings.min_chunk_size {
            return None;
        }

        let chunk = whole_document(text, total_chars);
        tracing::info!(
            "Text is short, returning 1 chunk (~{} tokens)",
            chunk.size_estimate
        );
        Some(chunk)
    }

    fn log_summary(&self, chunks: &[Chunk]) {
        tracing::info!("Split complete: {} chunks", chunks.len());
        for chunk in chunks {
            tracing::debug!(
                "  {}: {} tokens, {} chars [{}:{}]",
                chunk.id,
                chunk.size_estimate,
                chunk.text.chars().count(),
                chunk.start_char,
                chunk.end_char
            );
        }
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(SplitterSettings::default())
    }
}

fn whole_document(text: &str, total_chars: usize) -> Chunk {
    Chunk {
        id: Chunk::format_id(1),
        text: text.to_string(),
        size_estimate: estimate_tokens(text),
        start_char: 0,
        end_char: total_chars,
    }
}
