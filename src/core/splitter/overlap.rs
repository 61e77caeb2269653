//! Overlap selection between consecutive chunks.

use super::segment::TextUnit;

/// Pick the trailing units of a flushed chunk that seed the next one.
///
/// Walks `units` backwards, accumulating character lengths, and
/// stops at the first unit that brings the total to at least
/// `target_chars` (that unit is included). If the target is never
/// reached, every unit is returned. Order is preserved.
///
/// Returns nothing when `target_chars` is 0 or `units` is empty.
pub fn select_overlap<U: TextUnit + Clone>(units: &[U], target_chars: usize) -> Vec<U> {
    if target_chars == 0 || units.is_empty() {
        return Vec::new();
    }

    let mut accumulated = 0;
    let mut first = units.len();
    for (idx, unit) in units.iter().enumerate().rev() {
        first = idx;
        accumulated += unit.char_len();
        if accumulated >= target_chars {
            break;
        }
    }

    units[first..].to_vec()
}
