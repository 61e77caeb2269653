//! Sentence and paragraph segmentation.
//!
//! Both segmenters split on a boundary pattern, trim each piece
//! and drop empty ones. Every [`Segment`] remembers where it sits
//! in the source document (in characters, not bytes), so chunk
//! offsets can be derived from the units a chunk really contains.

use once_cell::sync::Lazy;
use regex::Regex;

/// One or more sentence terminators (CJK and Latin, full-width forms included)
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[。．！？.!?]+").unwrap());

/// A blank line: two or more consecutive newlines
static PARAGRAPH_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Anything the windowing loop can pack into a chunk.
pub trait TextUnit {
    /// Trimmed text of the unit
    fn text(&self) -> &str;

    /// Length of the unit in characters
    fn char_len(&self) -> usize;

    /// Char offset of the unit's first character in the source
    fn start_char(&self) -> usize;

    /// Char offset one past the unit's last character
    fn end_char(&self) -> usize {
        self.start_char() + self.char_len()
    }
}

/// A trimmed sentence or paragraph borrowed from the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    text: &'a str,
    start_char: usize,
    char_len: usize,
}

impl<'a> Segment<'a> {
    pub fn new(text: &'a str, start_char: usize) -> Self {
        Self {
            text,
            start_char,
            char_len: text.chars().count(),
        }
    }

    /// Move the segment by `chars`, used when a paragraph is
    /// re-segmented into sentences
    pub fn shifted(self, chars: usize) -> Self {
        Self {
            start_char: self.start_char + chars,
            ..self
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }
}

impl TextUnit for Segment<'_> {
    fn text(&self) -> &str {
        self.text
    }

    fn char_len(&self) -> usize {
        self.char_len
    }

    fn start_char(&self) -> usize {
        self.start_char
    }
}

/// Split `text` into sentences.
///
/// Runs of terminators (`。．！？.!?`) separate sentences and are
/// not kept; the assembler puts a terminator back when rejoining.
///
/// # Example
///
/// ```
/// use kgsplit::core::splitter::split_sentences;
///
/// let sentences = split_sentences("机翼产生升力。尾翼保持稳定！！Why?");
/// let texts: Vec<&str> = sentences.iter().map(|s| s.as_str()).collect();
/// assert_eq!(texts, vec!["机翼产生升力", "尾翼保持稳定", "Why"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<Segment<'_>> {
    split_on(text, &SENTENCE_BOUNDARY)
}

/// Split `text` into paragraphs separated by blank lines.
pub fn split_paragraphs(text: &str) -> Vec<Segment<'_>> {
    split_on(text, &PARAGRAPH_BOUNDARY)
}

fn split_on<'a>(text: &'a str, boundary: &Regex) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut cursor = CharCursor::new(text);
    let mut piece_start = 0;

    for m in boundary.find_iter(text) {
        push_trimmed(&mut segments, &mut cursor, piece_start, m.start());
        piece_start = m.end();
    }
    push_trimmed(&mut segments, &mut cursor, piece_start, text.len());

    segments
}

fn push_trimmed<'a>(
    segments: &mut Vec<Segment<'a>>,
    cursor: &mut CharCursor<'a>,
    byte_start: usize,
    byte_end: usize,
) {
    let text: &'a str = cursor.text;
    let piece = &text[byte_start..byte_end];
    let leading = piece.len() - piece.trim_start().len();
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return;
    }

    let start_char = cursor.char_index(byte_start + leading);
    segments.push(Segment::new(trimmed, start_char));
}

/// Converts increasing byte offsets into char offsets without
/// rescanning the text from the start each time.
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_index(&mut self, byte: usize) -> usize {
        debug_assert!(byte >= self.byte, "cursor only moves forward");
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}
