//! Text helpers for table cells and titles.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string to `max_width` display columns, appending an ellipsis
/// when anything was cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > max_width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

/// Formats a server timestamp as a short date for table cells.
///
/// Falls back to the first ten characters when the timestamp does not parse
/// (the wire format is passed through untyped).
pub fn short_date(timestamp: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.chars().take(10).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello…");
    }

    #[test]
    fn truncate_respects_wide_characters() {
        let truncated = truncate_with_ellipsis("日本語のテキスト", 7);
        assert!(truncated.width() <= 7);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn short_date_formats_rfc3339() {
        assert_eq!(short_date("2026-03-14T09:26:53Z"), "2026-03-14");
    }

    #[test]
    fn short_date_falls_back_to_prefix() {
        assert_eq!(short_date("2026-03-14 09:26"), "2026-03-14");
    }
}
