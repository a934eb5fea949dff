//! Cleanup of raw model replies before they are parsed

use crate::error::{Result, ScreenerError};
use serde_json::Value;

const FENCE: &str = "```";

/// Drop a leading and a trailing code-fence line, if present.
pub fn strip_fences(raw: &str) -> String {
    let mut lines: Vec<&str> = raw.trim().lines().collect();

    if lines.first().is_some_and(|line| line.trim_start().starts_with(FENCE)) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| line.trim_start().starts_with(FENCE)) {
        lines.pop();
    }

    lines.join("\n")
}

/// Replace ASCII control characters with spaces. Newline and carriage
/// return survive.
pub fn replace_control_chars(text: &str) -> String {
    text.chars()
        .map(|c| if is_stray_control(c) { ' ' } else { c })
        .collect()
}

fn is_stray_control(c: char) -> bool {
    (c as u32) <= 0x1F && c != '\n' && c != '\r'
}

/// Fence-stripped, control-character-free reply text.
pub fn clean_response(raw: &str) -> String {
    replace_control_chars(&strip_fences(raw))
}

/// First line of the cleaned reply, for single-answer prompts.
pub fn first_line(raw: &str) -> String {
    clean_response(raw)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Parse a reply that should hold a JSON object. Commentary around the
/// object is tolerated by retrying on the outermost `{...}` span.
pub fn parse_json_object(raw: &str) -> Result<Value> {
    let cleaned = clean_response(raw);

    let value = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => value,
        Err(first_error) => outermost_object(&cleaned)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .ok_or_else(|| ScreenerError::MalformedModelJson(first_error.to_string()))?,
    };

    if !value.is_object() {
        return Err(ScreenerError::MalformedModelJson(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    Ok(value)
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
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
