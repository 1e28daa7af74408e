//! Text encoding utilities for receipt printers
//!
//! Receipt firmware expects either UTF-8 or single-byte Latin-1 text.
//! This module provides:
//! - Converting text to printer bytes per [`CharacterEncoding`]
//! - Column-width calculations for fixed-width layout
//! - Padding/truncating/centering strings to column widths

use crate::config::CharacterEncoding;

/// Convert text to printer bytes.
///
/// UTF-8 passes through as standard multi-byte encoding. Latin-1 keeps
/// the low byte of each codepoint: characters up to U+00FF map exactly
/// to ISO-8859-1, anything above is corrupted. This lossy behavior is
/// kept for legacy printer compatibility and is not configurable.
pub fn encode_text(s: &str, encoding: CharacterEncoding) -> Vec<u8> {
    match encoding {
        CharacterEncoding::Utf8 => s.as_bytes().to_vec(),
        CharacterEncoding::Latin1 => s.chars().map(|c| (c as u32 & 0xFF) as u8).collect(),
    }
}

/// Get the column width of a string
///
/// One column per character; the fixed receipt font is monospaced.
pub fn column_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to fit within a column width
pub fn truncate_columns(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_columns(s: &str, width: usize, align_right: bool) -> String {
    let current_width = column_width(s);
    if current_width >= width {
        return truncate_columns(s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Center a string within a column width by prefixing spaces.
///
/// Padding is floor((width - len) / 2). Over-length lines are returned
/// unchanged and allowed to overflow the column width; they are never
/// truncated here.
pub fn center_columns(s: &str, width: usize) -> String {
    let current_width = column_width(s);
    if current_width >= width {
        return s.to_string();
    }
    let padding = (width - current_width) / 2;
    format!("{}{}", " ".repeat(padding), s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_width() {
        assert_eq!(column_width("hello"), 5);
        assert_eq!(column_width("presença"), 8);
    }

    #[test]
    fn test_truncate_columns() {
        assert_eq!(truncate_columns("hello world", 5), "hello");
        assert_eq!(truncate_columns("oração", 4), "oraç");
    }

    #[test]
    fn test_pad_columns() {
        assert_eq!(pad_columns("hi", 5, false), "hi   ");
        assert_eq!(pad_columns("hi", 5, true), "   hi");
        assert_eq!(pad_columns("hello world", 5, false), "hello");
    }

    #[test]
    fn test_center_columns() {
        assert_eq!(center_columns("ab", 8), "   ab");
        assert_eq!(center_columns("abc", 8), "  abc");
        // Over-length text overflows rather than truncating
        assert_eq!(center_columns("long line here", 4), "long line here");
    }

    #[test]
    fn test_encode_utf8() {
        assert_eq!(encode_text("abc", CharacterEncoding::Utf8), b"abc");
        assert_eq!(
            encode_text("ção", CharacterEncoding::Utf8),
            "ção".as_bytes()
        );
    }

    #[test]
    fn test_encode_latin1_low_byte() {
        // ç = U+00E7 maps exactly
        assert_eq!(encode_text("ç", CharacterEncoding::Latin1), vec![0xE7]);
        // € = U+20AC keeps only the low byte (0xAC) - accepted corruption
        assert_eq!(encode_text("€", CharacterEncoding::Latin1), vec![0xAC]);
        // One byte per char, regardless of codepoint
        assert_eq!(column_width("çã€"), encode_text("çã€", CharacterEncoding::Latin1).len());
    }
}
