//! Greedy windowing shared by every chunking strategy.
//!
//! A [`Window`] packs units (sentences or paragraphs) until the next
//! one would overflow the character budget, then flushes:
//!
//! ```text
//!  ACCUMULATING --(next unit overflows, pending non-empty)--> FLUSH
//!  FLUSH        --(emit chunk, select overlap seed)---------> SEEDED
//!  SEEDED       --(append the current unit)-----------------> ACCUMULATING
//! ```
//!
//! After the last unit, [`Window::finish`] emits whatever is pending.

use super::estimator::estimate_tokens;
use super::overlap::select_overlap;
use super::segment::TextUnit;
use crate::core::types::Chunk;

/// How units are glued back together inside a chunk
#[derive(Debug, Clone, Copy)]
pub struct Joiner<'s> {
    separator: &'s str,
    /// Also append the separator after the last unit
    terminal: bool,
}

impl<'s> Joiner<'s> {
    /// Sentences lose their terminator on segmentation, so it is put
    /// back after every sentence.
    pub fn sentences(terminator: &'s str) -> Self {
        Self {
            separator: terminator,
            terminal: true,
        }
    }

    pub fn paragraphs() -> Joiner<'static> {
        Joiner {
            separator: "\n\n",
            terminal: false,
        }
    }

    pub fn join<U: TextUnit>(&self, units: &[U]) -> String {
        let mut text = String::new();
        for (idx, unit) in units.iter().enumerate() {
            if idx > 0 {
                text.push_str(self.separator);
            }
            text.push_str(unit.text());
        }
        if self.terminal && !units.is_empty() {
            text.push_str(self.separator);
        }
        text
    }
}

/// Collects emitted chunks and hands out sequential ids.
///
/// Shared between nested windows so ids stay monotonic across a
/// paragraph that had to be re-packed sentence by sentence.
#[derive(Debug, Default)]
pub struct ChunkSink {
    chunks: Vec<Chunk>,
}

impl ChunkSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one chunk made of `units`. Empty input is ignored.
    pub fn emit<U: TextUnit>(&mut self, units: &[U], joiner: &Joiner<'_>) {
        let (Some(first), Some(last)) = (units.first(), units.last()) else {
            return;
        };

        let text = joiner.join(units);
        self.chunks.push(Chunk {
            id: Chunk::format_id(self.chunks.len() + 1),
            size_estimate: estimate_tokens(&text),
            start_char: first.start_char(),
            end_char: last.end_char(),
            text,
        });
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }
}

/// Greedy, overlap-carrying packer over one kind of unit
#[derive(Debug)]
pub struct Window<'j, U> {
    max_chars: usize,
    overlap_chars: usize,
    joiner: Joiner<'j>,
    pending: Vec<U>,
    pending_chars: usize,
}

impl<'j, U: TextUnit + Clone> Window<'j, U> {
    pub fn new(max_chars: usize, overlap_chars: usize, joiner: Joiner<'j>) -> Self {
        Self {
            max_chars,
            overlap_chars,
            joiner,
            pending: Vec::new(),
            pending_chars: 0,
        }
    }

    /// Add the next unit, flushing first if it would overflow the budget.
    ///
    /// A unit larger than the whole budget still goes in; it ends up
    /// as an oversized chunk rather than being dropped.
    pub fn push(&mut self, unit: U, sink: &mut ChunkSink) {
        if self.pending_chars + unit.char_len() > self.max_chars && !self.pending.is_empty() {
            self.flush(sink);
        }

        self.pending_chars += unit.char_len();
        self.pending.push(unit);
    }

    /// Emit pending units and keep the overlap tail as the new seed
    fn flush(&mut self, sink: &mut ChunkSink) {
        sink.emit(&self.pending, &self.joiner);

        let seed = select_overlap(&self.pending, self.overlap_chars);
        self.pending_chars = seed.iter().map(TextUnit::char_len).sum();
        self.pending = seed;
    }

    /// Emit pending units and start over with nothing carried
    pub fn flush_unseeded(&mut self, sink: &mut ChunkSink) {
        if self.pending.is_empty() {
            return;
        }

        sink.emit(&self.pending, &self.joiner);
        self.pending.clear();
        self.pending_chars = 0;
    }

    /// Emit the trailing chunk, however small
    pub fn finish(mut self, sink: &mut ChunkSink) {
        self.flush_unseeded(sink);
    }

    pub fn pending_chars(&self) -> usize {
        self.pending_chars
    }
}
