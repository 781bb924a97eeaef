//! Monospace display width of cell text.
//!
//! Text is NFC-normalized first so a base letter followed by a combining mark
//! counts as the single precomposed glyph it renders as.  Each remaining
//! character takes two columns when its East-Asian width is Wide or
//! Fullwidth, and one column otherwise.
//!
//! `unicode-width` answers for almost every code point.  It deliberately
//! departs from the East-Asian width table for a few characters (it gives
//! combining marks zero width and treats U+17A4 as two columns), so those
//! are pinned here to their table value.

use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthChar;

/// Columns occupied by a single character.
///
/// Zero-width and control characters still count as one column, matching the
/// Neutral/Ambiguous classes they fall into.
pub fn char_width(ch: char) -> usize {
    match ch {
        // Wide in the table, zero or one column in unicode-width
        '\u{302A}'..='\u{302F}' | '\u{3099}'..='\u{309A}' | '\u{3164}' => 2,
        // KHMER INDEPENDENT VOWEL QAA is Neutral
        '\u{17A4}' => 1,
        _ => match ch.width() {
            Some(2) => 2,
            _ => 1,
        },
    }
}

/// Columns occupied by `text` once rendered in a monospace terminal.
pub fn display_width(text: &str) -> usize {
    text.nfc().map(char_width).sum()
}
