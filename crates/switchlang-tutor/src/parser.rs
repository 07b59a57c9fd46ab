//! Interpret raw backend text
//!
//! One function per expected shape: line list, single evaluation object,
//! id-keyed batch object. None of them fail; shape mismatches become an
//! error-marked result or missing entries.

use serde_json::Value;
use std::collections::BTreeSet;
use switchlang_domain::{BatchResponseMap, EvaluationResult};
use tracing::{debug, warn};

/// Characters of raw text kept in error diagnostics by default
pub const DEFAULT_SNIPPET_CHARS: usize = 200;

/// Split free-form text into trimmed, non-empty lines
pub fn parse_line_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove markdown code fences the backend may wrap around JSON
///
/// Handles a leading fence with or without a language tag, a trailing fence,
/// and the single-line form.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            // Single line: drop a language tag glued to the fence
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }

    let trimmed = text.trim_end();
    if let Some(rest) = trimmed.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse one evaluation object
///
/// On any decode failure returns `EvaluationResult::error` with a diagnostic
/// holding the decode error and a snippet of the raw text.
pub fn parse_evaluation_object(raw: &str) -> EvaluationResult {
    parse_evaluation_object_with_snippet(raw, DEFAULT_SNIPPET_CHARS)
}

/// [`parse_evaluation_object`] with a configurable diagnostic snippet length
pub fn parse_evaluation_object_with_snippet(raw: &str, snippet_chars: usize) -> EvaluationResult {
    let decoded = decode_json(raw)
        .and_then(|value| serde_json::from_value::<EvaluationResult>(value));

    match decoded {
        Ok(result) => result,
        Err(e) => {
            warn!("Failed to parse evaluation response: {}", e);
            EvaluationResult::error(format!(
                "Failed to parse evaluation response ({}). Raw response: {}",
                e,
                snippet(raw, snippet_chars)
            ))
        }
    }
}

/// Parse an id-keyed batch object
///
/// Keys are trimmed and parsed as non-negative integers; keys that do not
/// parse or are not in `expected_ids` are dropped, as are values that do not
/// decode as an evaluation. A payload that is not a JSON object yields an
/// empty map.
pub fn parse_batch_object(raw: &str, expected_ids: &BTreeSet<usize>) -> BatchResponseMap {
    let mut results = BatchResponseMap::new();

    let object = match decode_json(raw) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            warn!("Batch response is not a JSON object (got {})", json_kind(&other));
            return results;
        }
        Err(e) => {
            warn!("Failed to parse batch response: {}", e);
            return results;
        }
    };

    for (key, value) in object {
        let Some(id) = coerce_id(&key) else {
            warn!("Dropping batch entry with non-numeric key '{}'", key);
            continue;
        };

        if !expected_ids.contains(&id) {
            warn!("Dropping batch entry for unexpected id {}", id);
            continue;
        }

        match serde_json::from_value::<EvaluationResult>(value) {
            Ok(result) => {
                results.insert(id, result);
            }
            Err(e) => {
                warn!("Dropping malformed batch entry {}: {}", id, e);
            }
        }
    }

    debug!(
        "Batch response decoded {}/{} expected entries",
        results.len(),
        expected_ids.len()
    );

    results
}

/// Identifier coercion rule for batch keys
fn coerce_id(key: &str) -> Option<usize> {
    key.trim().parse::<usize>().ok()
}

/// Decode backend text as JSON after removing fences
///
/// Falls back to the outermost `{...}` span when the backend added prose
/// around the object.
fn decode_json(raw: &str) -> Result<Value, serde_json::Error> {
    let stripped = strip_code_fences(raw);

    match serde_json::from_str::<Value>(stripped) {
        Ok(value) => Ok(value),
        Err(e) => match (stripped.find('{'), stripped.rfind('}')) {
            (Some(start), Some(end)) if start > 0 || end + 1 < stripped.len() => {
                if start < end {
                    serde_json::from_str::<Value>(&stripped[start..=end]).map_err(|_| e)
                } else {
                    Err(e)
                }
            }
            _ => Err(e),
        },
    }
}

fn snippet(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
