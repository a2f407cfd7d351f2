//! Extraction of the JSON document from model text.
//!
//! Endpoints asked for structured output normally return bare JSON, but
//! some models still wrap it in a fenced ` ```json ` block or add a line of
//! prose around it.

use serde_json::Value;

/// Parse the JSON object carried by a model response.
///
/// Tries, in order: the whole text, the first fenced code block, and the
/// outermost `{ ... }` span.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(block) = fenced_block(trimmed)
        && let Ok(value) = serde_json::from_str::<Value>(&block)
    {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
}

fn fenced_block(text: &str) -> Option<String> {
    let mut in_block = false;
    let mut block = String::new();

    for line in text.lines() {
        let t = line.trim();
        if !in_block && t.starts_with("```") {
            in_block = true;
            block.clear();
        } else if in_block && t == "```" {
            return Some(block);
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_json() {
        assert_eq!(extract_json(r#" {"status":"ask"} "#), Some(json!({"status": "ask"})));
    }

    #[test]
    fn test_fenced_json() {
        let text = "Here you go:\n```json\n{\"topics\": []}\n```\n";
        assert_eq!(extract_json(text), Some(json!({"topics": []})));
    }

    #[test]
    fn test_embedded_object() {
        let text = "Sure! {\"fit_label\": \"good_fit\"} Hope that helps.";
        assert_eq!(extract_json(text), Some(json!({"fit_label": "good_fit"})));
    }

    #[test]
    fn test_no_json() {
        assert_eq!(extract_json("I cannot answer that."), None);
    }
}
