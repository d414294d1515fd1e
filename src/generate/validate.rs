// Structural validation of provider responses
//
// Providers are asked for strict JSON but routinely wrap it in Markdown
// fences or an envelope object. The validator normalizes those shapes,
// drops malformed items, and truncates to the requested count. It never
// pads: a provider returning fewer items than requested is accepted as-is,
// because padding AI-authored factual content with synthetic items would be
// misleading.

use serde_json::Value;
use thiserror::Error;

use crate::quiz::QuizItem;

/// Why a provider response could not be turned into quiz items.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("response JSON is neither a list nor an object wrapping a list")]
    UnexpectedShape,
    #[error("response contained no well-formed quiz items")]
    NoValidItems,
}

/// Parse raw provider text into at most `num_questions` validated items.
pub fn parse_quiz_response(raw: &str, num_questions: usize) -> Result<Vec<QuizItem>, ParseError> {
    let stripped = strip_code_fences(raw);
    let value: Value = serde_json::from_str(stripped)?;

    let entries = match value {
        Value::Array(entries) => entries,
        // Some models wrap the list in an object ({"questions": [...]})
        Value::Object(map) => {
            let mut arrays = map.into_iter().filter_map(|(_, v)| match v {
                Value::Array(entries) => Some(entries),
                _ => None,
            });
            match (arrays.next(), arrays.next()) {
                (Some(entries), None) => entries,
                _ => return Err(ParseError::UnexpectedShape),
            }
        }
        _ => return Err(ParseError::UnexpectedShape),
    };

    let mut items = Vec::new();
    for entry in entries {
        match serde_json::from_value::<QuizItem>(entry) {
            Ok(item) if item.is_well_formed() => items.push(item),
            Ok(item) => {
                tracing::warn!(question = %item.question, "dropping structurally invalid quiz item");
            }
            Err(e) => {
                tracing::warn!("dropping unparsable quiz item: {e}");
            }
        }
    }

    if items.is_empty() {
        return Err(ParseError::NoValidItems);
    }
    items.truncate(num_questions);
    Ok(items)
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
