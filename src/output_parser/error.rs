//! Error types for model output parsing.

/// Errors returned by the output parser.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The model response was empty or whitespace-only.
    #[error("empty model response")]
    EmptyResponse,

    /// No parsing strategy could recover a structured value.
    #[error("unparseable response: {text}")]
    Unparseable {
        /// A truncated copy of the cleaned text (max 200 chars).
        text: String,
    },
}

/// Truncate a string to at most `max_len` bytes on a char boundary,
/// appending "..." if truncated.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_unchanged() {
        assert_eq!(truncate("abc", 200), "abc");
    }

    #[test]
    fn truncate_long_appends_ellipsis() {
        let long = "x".repeat(300);
        let out = truncate(&long, 200);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "ééééé";
        let out = truncate(s, 3);
        assert!(out.ends_with("..."));
    }
}
