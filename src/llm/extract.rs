// src/llm/extract.rs

use serde_json::{Map, Value};
use tracing::debug;

/// Extract the first JSON object embedded in arbitrary text.
///
/// Greedy match from the first `{` to the last `}`. Deliberately permissive:
/// it assumes the text contains at most one JSON object of interest. Known
/// limitation: stray braces in surrounding prose make the candidate span
/// undecodable and the whole extraction fails.
pub fn extract_json(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            debug!("Failed to decode extracted JSON candidate: {}", e);
            None
        }
    }
}
