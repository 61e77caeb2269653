//! Heuristic token estimation.
//!
//! No tokenizer is available, so the size of a span is estimated
//! from the classes of its characters: ideographs are token-dense,
//! Latin letters token-sparse, everything else in between.

/// Weight of an ideographic character, in tenths of a token
const IDEOGRAPHIC_TENTHS: usize = 15;

/// Weight of a Latin letter, in tenths of a token
const LATIN_TENTHS: usize = 3;

/// Weight of any other character, in tenths of a token
const OTHER_TENTHS: usize = 5;

/// Character class used for weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Ideographic,
    Latin,
    Other,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        match c {
            '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}' => {
                CharClass::Ideographic
            }
            'a'..='z' | 'A'..='Z' => CharClass::Latin,
            _ => CharClass::Other,
        }
    }

    fn weight_tenths(self) -> usize {
        match self {
            CharClass::Ideographic => IDEOGRAPHIC_TENTHS,
            CharClass::Latin => LATIN_TENTHS,
            CharClass::Other => OTHER_TENTHS,
        }
    }
}

/// Estimate the number of tokens in `text`.
///
/// Sums 1.5 per ideograph, 0.3 per Latin letter and 0.5 per other
/// character, floors the result and never returns less than 1, so
/// no span (not even the empty one) is treated as free.
///
/// Weights are accumulated in integer tenths, which keeps the
/// estimate monotonic: appending a character never lowers it.
///
/// # Example
///
/// ```
/// use kgsplit::core::splitter::estimate_tokens;
///
/// assert_eq!(estimate_tokens("机翼升力"), 6);
/// assert_eq!(estimate_tokens("wing"), 1);
/// assert_eq!(estimate_tokens(""), 1);
/// ```
pub fn estimate_tokens(text: &str) -> usize {
    let tenths: usize = text
        .chars()
        .map(|c| CharClass::of(c).weight_tenths())
        .sum();

    (tenths / 10).max(1)
}
