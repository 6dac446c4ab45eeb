//! Resilient parser for model output.
//!
//! Tries a strict parse first. If that fails, runs a purely syntactic repair
//! pass (fences, comments, trailing commas, unbalanced brackets and quotes)
//! and parses again. Repair never invents titles or content: a payload that
//! is structurally valid but empty still counts as repaired, and filling it
//! in is the coalescer's job.

use serde::Deserialize;
use serde_json::Value;

/// Article fields as returned by the model. Every field is optional so that
/// partial payloads survive parsing; wrong types do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticlePayload {
    /// Article title.
    #[serde(default)]
    pub title: Option<String>,
    /// Opening paragraph.
    #[serde(default)]
    pub introduction: Option<String>,
    /// Sections, conclusion last.
    #[serde(default)]
    pub sections: Option<Vec<SectionPayload>>,
    /// Tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// One section as returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SectionPayload {
    /// Section heading.
    #[serde(default)]
    pub title: Option<String>,
    /// Section body.
    #[serde(default)]
    pub content: Option<String>,
}

/// Why raw text could not be turned into a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    /// Repaired text still did not match the article schema.
    #[error("parse error: {0}")]
    Parse(String),
    /// Repair could not produce candidate JSON at all.
    #[error("repair failed: {0}")]
    Repair(String),
}

impl ParseFailure {
    /// Short kind label for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Repair(_) => "repair",
        }
    }
}

/// Result of parsing one model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The raw text parsed as-is.
    Strict(ArticlePayload),
    /// The text parsed after syntactic repair.
    Repaired(ArticlePayload),
    /// Neither attempt produced a payload.
    Failed(ParseFailure),
}

/// Parse model output into an [`ArticlePayload`].
pub fn parse(raw: &str) -> ParseOutcome {
    if let Ok(payload) = parse_strict(raw) {
        return ParseOutcome::Strict(payload);
    }

    let repaired = match repair(raw) {
        Ok(text) => text,
        Err(reason) => return ParseOutcome::Failed(ParseFailure::Repair(reason)),
    };

    match parse_strict(&repaired) {
        Ok(payload) => ParseOutcome::Repaired(payload),
        Err(reason) => ParseOutcome::Failed(ParseFailure::Parse(reason)),
    }
}

/// Strict parse: valid JSON, object root, fields of the right types.
///
/// # Errors
///
/// Returns a description of the syntax or schema error.
pub fn parse_strict(text: &str) -> Result<ArticlePayload, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err(format!(
            "expected a JSON object at the root, found {}",
            json_kind(&value)
        ));
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Repair
// ---------------------------------------------------------------------------

/// Syntactic repair of almost-JSON model output.
///
/// # Errors
///
/// Returns a reason when no JSON object start can be located.
pub fn repair(raw: &str) -> Result<String, String> {
    let cleaned = strip_reasoning_tags(raw);
    let body = strip_code_fence(&cleaned);
    let start = body
        .find('{')
        .ok_or_else(|| "no JSON object found in response".to_owned())?;
    let candidate = body.get(start..).unwrap_or_default();
    Ok(repair_json(candidate))
}

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Strip `<think>...</think>` reasoning blocks some models prepend.
///
/// A `</think>` with no earlier `<think>` closes reasoning whose opening tag
/// was never emitted, so everything up to it is dropped. An unclosed
/// `<think>` swallows the rest of the text.
pub fn strip_reasoning_tags(response: &str) -> String {
    let mut rest = response;
    if let Some(close) = rest.find(THINK_CLOSE) {
        if !matches!(rest.find(THINK_OPEN), Some(open) if open < close) {
            rest = rest
                .get(close.saturating_add(THINK_CLOSE.len())..)
                .unwrap_or_default();
        }
    }

    let mut result = String::with_capacity(rest.len());
    while let Some(start) = rest.find(THINK_OPEN) {
        result.push_str(rest.get(..start).unwrap_or_default());
        let inside = rest
            .get(start.saturating_add(THINK_OPEN.len())..)
            .unwrap_or_default();
        match inside.find(THINK_CLOSE) {
            Some(end) => {
                rest = inside
                    .get(end.saturating_add(THINK_CLOSE.len())..)
                    .unwrap_or_default();
            }
            None => return result,
        }
    }
    result.push_str(rest);
    result
}

/// Return the body of a markdown code fence when the text does not already
/// start with an object. An unclosed fence runs to the end of the text.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        return trimmed;
    }
    let Some(fence) = trimmed.find("```") else {
        return trimmed;
    };
    if trimmed.find('{').is_some_and(|brace| brace < fence) {
        return trimmed;
    }

    let after_fence = trimmed.get(fence.saturating_add(3)..).unwrap_or_default();
    // Skip the info string (`json`, `JSON`, ...) up to the end of the line.
    let body = match after_fence.find('\n') {
        Some(newline) => after_fence.get(newline.saturating_add(1)..).unwrap_or_default(),
        None => after_fence.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    match body.find("```") {
        Some(end) => body.get(..end).unwrap_or_default(),
        None => body,
    }
}

/// Single pass over the candidate text that restores JSON syntax.
///
/// Stops once the root value is closed, so trailing prose is dropped.
fn repair_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len().saturating_add(16));
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            if escaped {
                out.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => {
                    out.push(c);
                    escaped = true;
                }
                '"' if quote_ends_string(chars.clone()) => {
                    out.push(c);
                    in_string = false;
                }
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c < '\u{20}' => out.push_str(&format!("\\u{:04x}", u32::from(c))),
                c => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                insert_missing_comma(&mut out, &closers);
                out.push(c);
                in_string = true;
            }
            '{' | '[' => {
                insert_missing_comma(&mut out, &closers);
                out.push(c);
                closers.push(if c == '{' { '}' } else { ']' });
            }
            '}' | ']' => {
                if !closers.contains(&c) {
                    continue;
                }
                while let Some(top) = closers.pop() {
                    finish_container(&mut out, top);
                    out.push(top);
                    if top == c {
                        break;
                    }
                }
                if closers.is_empty() {
                    return out;
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            c => out.push(c),
        }
    }

    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    } else {
        complete_truncated_scalar(&mut out);
    }
    while let Some(top) = closers.pop() {
        finish_container(&mut out, top);
        out.push(top);
    }
    out
}

/// Whether a `"` met inside a string closes it. A quote followed by text is
/// treated as a literal quote in the prose; one followed by a delimiter, a
/// comment, the end of input, or a new line starting another string closes.
fn quote_ends_string(rest: std::iter::Peekable<std::str::Chars<'_>>) -> bool {
    let mut crossed_line = false;
    for c in rest {
        if c.is_whitespace() {
            crossed_line |= c == '\n';
            continue;
        }
        return match c {
            ',' | '}' | ']' | ':' | '/' => true,
            '"' => crossed_line,
            _ => false,
        };
    }
    true
}

/// Finish a scalar cut off by the end of input: complete a partial
/// `true`/`false`/`null` and drop a dangling `.`, exponent or sign.
fn complete_truncated_scalar(out: &mut String) {
    trim_end_in_place(out);

    let word_start = out
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map(|(idx, _)| idx);
    if let Some(idx) = word_start {
        let word = out.get(idx..).unwrap_or_default().to_owned();
        let standalone = !out
            .get(..idx)
            .unwrap_or_default()
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.');
        if standalone {
            if let Some(literal) = ["true", "false", "null"]
                .into_iter()
                .find(|literal| literal.starts_with(word.as_str()))
            {
                out.push_str(literal.get(word.len()..).unwrap_or_default());
                return;
            }
        }
    }

    let number_start = out
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        .last()
        .map(|(idx, _)| idx);
    let Some(idx) = number_start else {
        return;
    };
    let preceded_by_word = out
        .get(..idx)
        .unwrap_or_default()
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphabetic());
    if preceded_by_word {
        return;
    }
    while out
        .chars()
        .next_back()
        .is_some_and(|c| matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && out.len() > idx
    {
        out.pop();
    }
}

/// Prepare `out` for a closing bracket: drop a trailing comma, give a
/// dangling key or colon a `null` value.
fn finish_container(out: &mut String, closer: char) {
    trim_end_in_place(out);
    if out.ends_with(',') {
        out.pop();
        trim_end_in_place(out);
    }
    if out.ends_with(':') {
        out.push_str("null");
    } else if closer == '}' && ends_with_dangling_key(out) {
        out.push_str(":null");
    }
}

/// Insert a comma when a new value starts right after a completed one.
fn insert_missing_comma(out: &mut String, closers: &[char]) {
    if closers.is_empty() {
        return;
    }
    let last = out.chars().rev().find(|c| !c.is_whitespace());
    let completes_value = matches!(last, Some(c) if c == '"' || c == '}' || c == ']' || c.is_ascii_digit() || c == 'e' || c == 'l');
    if completes_value {
        out.push(',');
    }
}

/// Whether `out` ends with a string literal that sits in key position,
/// i.e. the previous structural character is `{` or `,`.
fn ends_with_dangling_key(out: &str) -> bool {
    let Some(body) = out.strip_suffix('"') else {
        return false;
    };
    let opening = body.char_indices().rev().find(|&(idx, ch)| {
        ch == '"'
            && body
                .get(..idx)
                .unwrap_or_default()
                .chars()
                .rev()
                .take_while(|c| *c == '\\')
                .count()
                & 1
                == 0
    });
    let Some((idx, _)) = opening else {
        return false;
    };
    let before = body.get(..idx).unwrap_or_default();
    matches!(
        before.chars().rev().find(|c| !c.is_whitespace()),
        Some('{') | Some(',')
    )
}

fn trim_end_in_place(out: &mut String) {
    let len = out.trim_end().len();
    out.truncate(len);
}
