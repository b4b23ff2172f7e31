//! The ordered fallback chain for recovering JSON from model output.

use serde_json::{json, Value};

use crate::output_parser::error::{truncate, ParseError};
use crate::output_parser::extract::{extract_field, find_flat_objects, strip_code_fences};
use crate::output_parser::repair::apply_repairs;

/// Recover a structured value (object or array) from raw model text.
///
/// Strategies, first success wins:
/// 1. Strip code-fence markers and trim
/// 2. Strict parse — valid input short-circuits here, untouched by repairs
/// 3. Textual repairs (trailing commas, raw newlines, single quotes), re-parse
/// 4. Flat-object fallback: scan for non-nested `{...}` literals; parse each
///    strictly, or recover a minimal `{title, content}` pair from it; return
///    the collected objects as an array
/// 5. Fail with [`ParseError::Unparseable`]
///
/// Stage 4 cannot recover nested malformed objects; that precision limit is
/// accepted in exchange for never rejecting a whole response over one stray
/// comma or smart quote.
///
/// # Examples
///
/// ```
/// use yt_carousel::output_parser::parse_value;
///
/// let value = parse_value("```json\n[{\"title\": \"A\", \"content\": \"B\"},]\n```").unwrap();
/// assert_eq!(value[0]["title"], "A");
/// ```
pub fn parse_value(raw: &str) -> Result<Value, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return Ok(value);
    }

    let repaired = apply_repairs(&cleaned);
    if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
        return Ok(value);
    }

    let recovered = recover_flat_objects(&repaired);
    if !recovered.is_empty() {
        return Ok(Value::Array(recovered));
    }

    Err(ParseError::Unparseable {
        text: truncate(&cleaned, 200),
    })
}

/// Stage 4: collect every flat object literal that either parses strictly
/// or yields a `title`/`content` pair under targeted field recovery.
fn recover_flat_objects(text: &str) -> Vec<Value> {
    let mut recovered = Vec::new();

    for object in find_flat_objects(text) {
        if let Ok(value) = serde_json::from_str::<Value>(object) {
            recovered.push(value);
            continue;
        }
        if let (Some(title), Some(content)) =
            (extract_field(object, "title"), extract_field(object, "content"))
        {
            recovered.push(json!({ "title": title, "content": content }));
        }
    }

    recovered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_json_untouched() {
        // Strict-parse short-circuit: output structurally equals strict parsing
        let input = r#"{"a": "don't, stop", "b": [1, 2]}"#;
        let value = parse_value(input).unwrap();
        let strict: Value = serde_json::from_str(input).unwrap();
        assert_eq!(value, strict);
    }

    #[test]
    fn valid_array_untouched() {
        let input = r#"[{"title": "A", "content": "B"}]"#;
        let value = parse_value(input).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[test]
    fn fenced_json() {
        let input = "```json\n[{\"title\": \"A\", \"content\": \"B\"}]\n```";
        let value = parse_value(input).unwrap();
        assert_eq!(value[0]["title"], "A");
    }

    #[test]
    fn bare_fence() {
        let input = "```\n{\"a\": 1}\n```";
        let value = parse_value(input).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn trailing_comma_same_as_comma_free() {
        let with = parse_value(r#"[{"a": 1},]"#).unwrap();
        let without = parse_value(r#"[{"a": 1}]"#).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn single_quotes_same_as_double() {
        let single = parse_value("{'key': 'value'}").unwrap();
        let double = parse_value(r#"{"key": "value"}"#).unwrap();
        assert_eq!(single, double);
    }

    #[test]
    fn raw_newline_inside_string() {
        let input = "{\"content\": \"line one\nline two\"}";
        let value = parse_value(input).unwrap();
        assert_eq!(value["content"], "line one\nline two");
    }

    #[test]
    fn objects_embedded_in_prose() {
        let input = r#"Sure! Here are the slides:
{"title": "First", "content": "One"} and also
{"title": "Second", "content": "Two"}. Hope that helps!"#;
        let value = parse_value(input).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["title"], "First");
        assert_eq!(array[1]["title"], "Second");
    }

    #[test]
    fn broken_object_recovers_title_and_content() {
        // The bare `bad` token defeats strict parsing; field recovery kicks in
        let input = r#"[{"title": "The Hook", "content": "Why it matters", "extra": bad}]"#;
        let value = parse_value(input).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array[0]["title"], "The Hook");
        assert_eq!(array[0]["content"], "Why it matters");
    }

    #[test]
    fn plain_prose_fails() {
        let err = parse_value("hello world").unwrap_err();
        assert!(matches!(err, ParseError::Unparseable { .. }));
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(parse_value(""), Err(ParseError::EmptyResponse)));
        assert!(matches!(parse_value("   "), Err(ParseError::EmptyResponse)));
    }

    #[test]
    fn fence_only_fails_empty() {
        assert!(matches!(
            parse_value("```json\n```"),
            Err(ParseError::EmptyResponse)
        ));
    }

    #[test]
    fn nested_objects_are_a_known_limit() {
        // The flat scanner finds only the inner object of a malformed nested
        // literal. Documented approximation, asserted so it doesn't drift.
        let input = r#"{"outer": {"title": "Inner", "content": "Only"}, broken"#;
        let value = parse_value(input).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["title"], "Inner");
    }
}
