use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Locates a JSON object inside a model reply.
///
/// Prefers a ```` ```json ```` fenced block, then falls back to the span
/// between the first `{` and the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body = &text[start + 7..];
        if let Some(end) = body.find("```") {
            let candidate = body[..end].trim();
            if candidate.starts_with('{') && candidate.ends_with('}') {
                return Some(candidate);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Deserializes the JSON object found in a model reply
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let json = extract_json_object(text)
        .ok_or_else(|| anyhow!("No JSON object found in response"))?;
    serde_json::from_str(json).map_err(|e| anyhow!("Failed to parse JSON response: {}", e))
}

/// Returns the body of a reply that is nothing but one ```` ```json ```` block
fn fenced_json_body(text: &str) -> Option<&str> {
    let body = text.trim().strip_prefix("```json")?.strip_suffix("```")?;
    if body.contains("```") {
        return None;
    }
    Some(body.trim())
}

/// Decodes a reply into a JSON record, if it holds one.
///
/// Only the whole trimmed text counts, or a reply made of a single fenced
/// JSON block. Prose that merely contains an object is not a record, and
/// JSON values that are not objects do not count either.
pub fn decode_record(text: &str) -> Option<Map<String, Value>> {
    let candidate = fenced_json_body(text).unwrap_or_else(|| text.trim());
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
