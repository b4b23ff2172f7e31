//! Deterministic textual repairs for common model JSON mistakes.
//!
//! Each repair is a manual char-scan — no regex. The repairs are
//! deliberately narrow: they only touch positions that are structurally
//! unambiguous, because the correct general behavior (e.g. apostrophes
//! inside single-quoted strings) is undefined without a full tokenizer.
//! Valid JSON never reaches this module; the parse chain short-circuits
//! on a successful strict parse first.

/// Apply the repair sequence in order:
/// 1. Remove trailing commas before `}` or `]`
/// 2. Escape raw newlines inside open string literals
/// 3. Normalize single-quote string delimiters at unambiguous positions
pub fn apply_repairs(text: &str) -> String {
    let mut s = remove_trailing_commas(text);
    s = escape_raw_newlines(&s);
    normalize_single_quotes(&s)
}

/// Remove commas that sit (possibly across whitespace) directly before a
/// closing brace or bracket. String contents are left alone.
pub fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escape_next = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if in_string {
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                in_string = false;
            }
            result.push(ch);
            i += 1;
            continue;
        }

        if ch == '"' {
            in_string = true;
            result.push(ch);
            i += 1;
            continue;
        }

        if ch == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                i += 1; // drop the comma, keep the whitespace
                continue;
            }
        }

        result.push(ch);
        i += 1;
    }
    result
}

/// Escape bare `\n`/`\r` occurring inside an open double-quoted string.
pub fn escape_raw_newlines(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escape_next = false;

    for ch in text.chars() {
        if in_string {
            if escape_next {
                escape_next = false;
                result.push(ch);
            } else if ch == '\\' {
                escape_next = true;
                result.push(ch);
            } else if ch == '"' {
                in_string = false;
                result.push(ch);
            } else if ch == '\n' {
                result.push_str("\\n");
            } else if ch == '\r' {
                result.push_str("\\r");
            } else {
                result.push(ch);
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        }
        result.push(ch);
    }
    result
}

/// Replace single quotes used as string delimiters with double quotes,
/// but only at structurally unambiguous positions: a quote immediately
/// after `{`, `,`, `[` or whitespace (or at the start), and a quote
/// immediately before `}`, `]`, `,`, `:` or whitespace (or at the end).
///
/// Apostrophes in running text (`don't`) match neither position and are
/// left alone. Quotes inside double-quoted strings are never touched.
pub fn normalize_single_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut in_double = false;
    let mut escape_next = false;

    for i in 0..chars.len() {
        let ch = chars[i];

        if in_double {
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                in_double = false;
            }
            result.push(ch);
            continue;
        }

        if ch == '"' {
            in_double = true;
            result.push(ch);
            continue;
        }

        if ch == '\'' {
            let opens = i == 0 || matches!(chars[i - 1], '{' | ',' | '[') || chars[i - 1].is_whitespace();
            let closes = i + 1 == chars.len()
                || matches!(chars[i + 1], '}' | ']' | ',' | ':')
                || chars[i + 1].is_whitespace();
            if opens || closes {
                result.push('"');
                continue;
            }
        }

        result.push(ch);
    }
    result
}
