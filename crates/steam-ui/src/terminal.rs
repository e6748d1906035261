use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ELLIPSIS: char = '…';

/// Number of columns `text` occupies on screen
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Longest prefix of `text` that fits in `max` columns
pub fn fit_width(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            return &text[..i];
        }
        used += w;
    }
    text
}

/// Cut text to at most `max` columns; overlong text keeps `max - 1`
/// columns and ends in an ellipsis
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    format!("{}{ELLIPSIS}", fit_width(text, max - 1))
}

/// Right-pad with spaces up to `width` columns. Never shortens.
pub fn pad_text(text: &str, width: usize) -> String {
    let current = display_width(text);
    if current >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - current))
    }
}
