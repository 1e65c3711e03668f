//! Text normalization helpers shared across passes.

use crate::model::RawLine;

/// Normalize extracted text: strip soft hyphens, zero-width characters and
/// BOM, turn non-breaking spaces into plain spaces, collapse whitespace.
pub fn norm_text(s: &str) -> String {
    let mut cleaned = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {}
            '\u{00A0}' => cleaned.push(' '),
            _ => cleaned.push(ch),
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join a line's span texts into one normalized string.
pub fn line_text(line: &RawLine) -> String {
    let joined = line
        .spans
        .iter()
        .map(|sp| sp.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    norm_text(&joined)
}

/// Check whether the text contains at least one alphabetic character.
pub fn has_alpha(s: &str) -> bool {
    s.chars().any(|c| c.is_alphabetic())
}

/// Character count of a string (lengths in this crate are characters, not bytes).
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
