//! Prompt formatting and reply extraction

use super::types::{ModelError, ModelJudgement};
use crate::logic::types::Turn;

/// `"speaker: text"`, one line per turn
pub fn format_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.speaker(), t.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First balanced `{...}` span in `text`.
///
/// Braces inside JSON strings are ignored, so fenced replies and prose
/// around the object are tolerated.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract and deserialize a judgement from raw model text
pub fn parse_reply(raw: &str) -> Result<ModelJudgement, ModelError> {
    let json = extract_json_object(raw).ok_or(ModelError::NoJson)?;
    Ok(serde_json::from_str(json)?)
}
