/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace("&", "&amp;")
        .replace("<", "&lt;")
        .replace(">", "&gt;")
        .replace("\"", "&quot;")
        .replace("'", "&#39;")
}

/// Check a candidate page title.
///
/// Titles double as file names inside the page stores, so only ASCII letters,
/// digits, `-` and `_` are allowed. This rules out separators, dots and
/// anything that could escape the store root.
pub fn is_valid_title(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
