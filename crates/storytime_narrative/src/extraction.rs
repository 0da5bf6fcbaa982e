//! Utilities for extracting structured data from model responses.
//!
//! Model responses often wrap JSON in markdown code blocks or surround it
//! with explanatory text.

use serde::de::DeserializeOwned;
use storytime_error::{JsonError, StorytimeResult};

/// Extract JSON from a response that may contain markdown or extra text.
///
/// This function tries multiple extraction strategies:
/// 1. Markdown code blocks: ```json ... ```
/// 2. Balanced braces: { ... }
/// 3. Balanced brackets: [ ... ]
///
/// # Errors
///
/// Returns an error if no JSON is found in the response.
///
/// # Examples
///
/// ```
/// use storytime_narrative::extract_json;
///
/// let response = "Here is the summary:\n\
///     \n\
///     ```json\n\
///     {\"setting\": \"a meadow\"}\n\
///     ```\n";
///
/// let json = extract_json(response).unwrap();
/// assert!(json.contains("meadow"));
/// ```
pub fn extract_json(response: &str) -> StorytimeResult<String> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    let order = match (bracket_pos, brace_pos) {
        (Some(b_pos), Some(c_pos)) if b_pos < c_pos => [('[', ']'), ('{', '}')],
        (Some(_), None) => [('[', ']'), ('{', '}')],
        _ => [('{', '}'), ('[', ']')],
    };
    for (open, close) in order {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    tracing::warn!(
        response_length = response.len(),
        "No JSON found in model response"
    );

    Err(JsonError::new(format!(
        "No JSON found in response (length: {})",
        response.len()
    ))
    .into())
}

/// Extract JSON from a response and deserialize it.
///
/// # Examples
///
/// ```
/// use storytime_narrative::{StoryMetadata, parse_json};
///
/// let metadata: StoryMetadata =
///     parse_json(r#"Sure! {"characters": ["Pip"], "setting": "an oak tree"}"#).unwrap();
/// assert_eq!(metadata.characters, vec!["Pip".to_string()]);
/// ```
pub fn parse_json<T: DeserializeOwned>(response: &str) -> StorytimeResult<T> {
    let json = extract_json(response)?;
    serde_json::from_str(&json)
        .map_err(|e| JsonError::new(format!("Failed to parse model JSON: {}", e)).into())
}

/// Content of the first markdown code block, preferring the given language.
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);

    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        let content = match response[content_start..].find("```") {
            Some(end) => &response[content_start..content_start + end],
            // Truncated response without a closing fence
            None => &response[content_start..],
        };
        return Some(content.trim().to_string());
    }

    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        let skip_to = response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);

        let content = match response[skip_to..].find("```") {
            Some(end) => &response[skip_to..skip_to + end],
            None => &response[skip_to..],
        };
        return Some(content.trim().to_string());
    }

    None
}

/// Content between the first `open` and its matching `close`.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
