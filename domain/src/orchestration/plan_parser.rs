//! Strict decoding of the oracle's "list of agent names" answer.
//!
//! The orchestrator asks the oracle to answer with a flat JSON array of
//! strings, e.g. `["SyntaxAgent", "SemanticsAgent"]`. Two shapes are
//! accepted:
//! 1. The whole (trimmed) answer is the array
//! 2. The array is the content of the first fenced code block (```` ``` ````
//!    or ```` ```json ````)
//!
//! Anything else (prose around a bare array, nested arrays, objects,
//! numbers) is rejected with a [`PlanDecodeError`].

use thiserror::Error;

/// Why an oracle answer could not be decoded as a list of agent names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanDecodeError {
    #[error("response is empty")]
    Empty,

    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("expected a JSON array of agent names")]
    NotAnArray,

    #[error("element {index} is not a string")]
    NonStringElement { index: usize },
}

/// Decode a flat array of agent names from the oracle's answer
pub fn decode_agent_names(response: &str) -> Result<Vec<String>, PlanDecodeError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(PlanDecodeError::Empty);
    }

    let payload = fenced_block(trimmed).unwrap_or(trimmed);

    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| PlanDecodeError::NotJson(e.to_string()))?;

    let array = value.as_array().ok_or(PlanDecodeError::NotAnArray)?;

    array
        .iter()
        .enumerate()
        .map(|(index, element)| {
            element
                .as_str()
                .map(str::to_string)
                .ok_or(PlanDecodeError::NonStringElement { index })
        })
        .collect()
}

/// Content of the first fenced code block, if the response has one
fn fenced_block(response: &str) -> Option<&str> {
    let start = response.find("```")?;
    let after_fence = &response[start + 3..];
    // Skip the info string (e.g. "json") up to the end of the line
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}
