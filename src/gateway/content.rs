// src/gateway/content.rs
//! Turning model output into JSON values

use serde_json::{json, Value};

const FENCE: &str = "```";

/// A fence opens a JSON block when it carries a `json` tag (any case) or no
/// tag at all, directly followed by whitespace or a JSON opener.
fn json_fence_body(after_fence: &str) -> Option<&str> {
    let body = match after_fence.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &after_fence[4..],
        _ => after_fence,
    };
    match body.chars().next() {
        Some(c) if c.is_whitespace() || c == '{' || c == '[' => Some(body),
        _ => None,
    }
}

/// Body of the first ```` ```json ```` (or untagged) fenced block, trimmed.
/// Blocks tagged with another language are skipped whole.
pub fn fenced_block(content: &str) -> Option<&str> {
    let mut rest = content;
    loop {
        let start = rest.find(FENCE)?;
        let after_fence = &rest[start + FENCE.len()..];
        let end = after_fence.find(FENCE)?;

        if let Some(body) = json_fence_body(&after_fence[..end]) {
            return Some(body.trim());
        }
        rest = &after_fence[end + FENCE.len()..];
    }
}

/// Parse a structured answer: plain JSON first, then the first fenced block.
/// Output with no fenced block at all is kept verbatim under `rawResponse`;
/// a fenced block that is not valid JSON is an error.
pub fn parse_structured(content: &str) -> Result<Value, serde_json::Error> {
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Ok(value);
    }

    match fenced_block(content) {
        Some(block) => serde_json::from_str(block),
        None => Ok(json!({ "rawResponse": content })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_is_parsed_directly() {
        let value = parse_structured(r#"{"overallScore": 80}"#).unwrap();
        assert_eq!(value["overallScore"], 80);
    }

    #[test]
    fn test_json_fence_is_unwrapped() {
        let content = "Here you go:\n```json\n{\"matchScore\": 91}\n```\nGood luck!";
        let value = parse_structured(content).unwrap();
        assert_eq!(value["matchScore"], 91);
    }

    #[test]
    fn test_bare_fence_is_unwrapped() {
        let content = "```\n{\"min\": 1}\n```";
        assert_eq!(parse_structured(content).unwrap()["min"], 1);
    }

    #[test]
    fn test_prose_is_kept_as_raw_response() {
        let value = parse_structured("I could not score this resume.").unwrap();
        assert_eq!(value["rawResponse"], "I could not score this resume.");
    }

    #[test]
    fn test_broken_fenced_json_is_an_error() {
        assert!(parse_structured("```json\n{not json}\n```").is_err());
    }

    #[test]
    fn test_uppercase_json_tag_is_unwrapped() {
        let value = parse_structured("```JSON\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_other_language_fence_is_kept_as_raw_response() {
        let content = "Sure! Example:\n```python\nprint('hi')\n```\nThat prints a greeting.";
        assert_eq!(fenced_block(content), None);

        let value = parse_structured(content).unwrap();
        assert_eq!(value["rawResponse"], content);
    }

    #[test]
    fn test_json_block_after_other_fence_is_found() {
        let content = "```bash\nls\n```\nResult:\n```json\n{\"matchScore\": 70}\n```";
        assert_eq!(parse_structured(content).unwrap()["matchScore"], 70);
    }

    #[test]
    fn test_unterminated_fence_has_no_block() {
        assert_eq!(fenced_block("```json {\"a\": 1}"), None);
    }
}
