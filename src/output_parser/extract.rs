//! Extraction strategies: fence stripping, flat-object scanning, and
//! targeted field recovery. All manual string scans, no regex.

/// Remove markdown code-fence markers (language-tagged and bare) and trim.
///
/// The fence *markers* are removed, not the fenced content — model output
/// often opens a fence and never closes it, so extracting between fences
/// would drop the payload.
///
/// # Examples
///
/// ```
/// use yt_carousel::output_parser::extract::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
/// assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
/// ```
pub fn strip_code_fences(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'`' && text[i..].starts_with("```") {
            i += 3;
            // Swallow a language tag directly after the fence (e.g. "json")
            while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                i += 1;
            }
            continue;
        }
        // Safe: we only land on char boundaries because '`' is ASCII and we
        // otherwise advance by full chars.
        let ch = text[i..].chars().next().expect("in bounds");
        result.push(ch);
        i += ch.len_utf8();
    }

    result.trim().to_string()
}

/// Scan for balanced, non-nested `{...}` regions.
///
/// Returns each flat object literal as a slice of the input. Nested objects
/// are not recoverable this way — the inner object is found, the outer one
/// is not. That is an accepted precision limit of the fallback stage, not
/// something to fix here.
pub fn find_flat_objects(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' => start = Some(i),
            '}' => {
                if let Some(s) = start.take() {
                    found.push(&text[s..=i]);
                }
            }
            _ => {}
        }
    }

    found
}

/// Pull a quoted field value out of an object literal that failed strict
/// parsing, e.g. `title: 'Some text'` or `"title": "Some text"`.
///
/// Accepts optionally quoted keys and either quote style around the value.
/// The value ends at the first matching quote.
pub fn extract_field<'a>(object: &'a str, key: &str) -> Option<&'a str> {
    let mut search_from = 0;
    while let Some(offset) = object[search_from..].find(key) {
        let key_start = search_from + offset;
        let mut rest = object[key_start + key.len()..].char_indices().peekable();

        // Optional closing quote on the key itself
        if let Some(&(_, c)) = rest.peek() {
            if c == '"' || c == '\'' {
                rest.next();
            }
        }
        // Whitespace, then a colon, then whitespace
        let mut saw_colon = false;
        let mut value_quote = None;
        let mut value_start = None;
        for (i, c) in rest {
            match c {
                _ if c.is_whitespace() => continue,
                ':' if !saw_colon => saw_colon = true,
                '"' | '\'' if saw_colon => {
                    value_quote = Some(c);
                    value_start = Some(key_start + key.len() + i + c.len_utf8());
                    break;
                }
                _ => break,
            }
        }

        if let (Some(quote), Some(vs)) = (value_quote, value_start) {
            if let Some(end) = object[vs..].find(quote) {
                let value = &object[vs..vs + end];
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }

        search_from = key_start + key.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── strip_code_fences ──

    #[test]
    fn strips_tagged_fence() {
        let input = "```json\n[{\"a\": 1}]\n```";
        assert_eq!(strip_code_fences(input), "[{\"a\": 1}]");
    }

    #[test]
    fn strips_bare_fence() {
        let input = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn strips_unclosed_fence() {
        let input = "```json\n[1, 2, 3]";
        assert_eq!(strip_code_fences(input), "[1, 2, 3]");
    }

    #[test]
    fn no_fence_just_trims() {
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
    }

    #[test]
    fn fence_case_preserved_inside() {
        let input = "```JSON\n{\"a\": \"```not a fence start```\"}";
        // Inner triple-backticks are also markers; content survives around them
        assert!(strip_code_fences(input).contains("\"a\""));
    }

    // ── find_flat_objects ──

    #[test]
    fn finds_multiple_flat_objects() {
        let input = r#"Here: {"a": 1} and {"b": 2} done"#;
        let objects = find_flat_objects(input);
        assert_eq!(objects, vec![r#"{"a": 1}"#, r#"{"b": 2}"#]);
    }

    #[test]
    fn nested_object_yields_inner_only() {
        let input = r#"{"outer": {"inner": 1}}"#;
        let objects = find_flat_objects(input);
        assert_eq!(objects, vec![r#"{"inner": 1}"#]);
    }

    #[test]
    fn no_objects_in_plain_text() {
        assert!(find_flat_objects("hello world").is_empty());
    }

    // ── extract_field ──

    #[test]
    fn extracts_double_quoted_field() {
        let obj = r#"{"title": "The Hook", "content": "Body text"}"#;
        assert_eq!(extract_field(obj, "title"), Some("The Hook"));
        assert_eq!(extract_field(obj, "content"), Some("Body text"));
    }

    #[test]
    fn extracts_single_quoted_field() {
        let obj = "{'title': 'Ideas', 'content': 'Stuff'}";
        assert_eq!(extract_field(obj, "title"), Some("Ideas"));
    }

    #[test]
    fn extracts_unquoted_key() {
        let obj = r#"{title: "Plain key"}"#;
        assert_eq!(extract_field(obj, "title"), Some("Plain key"));
    }

    #[test]
    fn missing_field_is_none() {
        let obj = r#"{"title": "Only title"}"#;
        assert_eq!(extract_field(obj, "content"), None);
    }

    #[test]
    fn empty_value_is_none() {
        let obj = r#"{"title": ""}"#;
        assert_eq!(extract_field(obj, "title"), None);
    }
}
