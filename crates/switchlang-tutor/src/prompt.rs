//! Prompt construction for expression generation and answer evaluation
//!
//! Every builder is a pure function of its inputs. Learner and source texts
//! are embedded as JSON string literals, so quotes, backslashes and newlines
//! never break the prompt's structure.

use serde_json::{json, Value};
use switchlang_domain::{BatchRequest, DifficultyTier};

/// Schema hint passed alongside single-evaluation prompts
pub const EVALUATION_SCHEMA: &str = r#"{"type":"object","properties":{"is_correct":{"type":"boolean"},"corrected":{"type":"string"},"better_expression":{"type":"string"},"explanation":{"type":"string"}},"required":["is_correct","corrected","better_expression","explanation"]}"#;

/// Schema hint passed alongside batch-evaluation prompts
pub const BATCH_EVALUATION_SCHEMA: &str = r#"{"type":"object","additionalProperties":{"type":"object","properties":{"is_correct":{"type":"boolean"},"corrected":{"type":"string"},"better_expression":{"type":"string"},"explanation":{"type":"string"}},"required":["is_correct","corrected","better_expression","explanation"]}}"#;

/// Build the prompt asking for `count` practice expressions
pub fn build_expression_prompt(
    source_language: &str,
    count: usize,
    tier: DifficultyTier,
) -> String {
    format!(
        "List {count} useful expressions used in {source_language}.\n\
         \n\
         Target Level: {tier}\n\
         Style Guide: {directive}\n\
         \n\
         Constraints:\n\
         - Write every expression in {source_language} only. Do not add renderings in any other language, romanization, numbering, or commentary.\n\
         - Return exactly {count} lines, one expression per line, separated by newlines.\n\
         - Output the list and nothing else.",
        directive = tier.style_directive(),
    )
}

/// Build the prompt evaluating one learner answer
pub fn build_evaluation_prompt(
    source_text: &str,
    user_text: &str,
    source_language: &str,
    target_language: &str,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("Task: Evaluate a language practice answer.\n\n");
    prompt.push_str(&format!("Source Language: {}\n", source_language));
    prompt.push_str(&format!("Target Language: {}\n\n", target_language));

    prompt.push_str("Texts are given as JSON string literals.\n");
    prompt.push_str(&format!("Source Text: {}\n", json_string(source_text)));
    prompt.push_str(&format!("User's Answer: {}\n\n", json_string(user_text)));

    prompt.push_str(&evaluation_rules(target_language));
    prompt.push_str("\n\n");
    prompt.push_str(SINGLE_OUTPUT_FORMAT);

    prompt
}

/// Build one prompt evaluating every item of `items`
///
/// Items are listed with their integer ids; the backend is told to key its
/// answer object by the same ids written as decimal strings.
pub fn build_batch_evaluation_prompt(
    items: &BatchRequest,
    source_language: &str,
    target_language: &str,
) -> String {
    let entries: Vec<Value> = items
        .iter()
        .map(|(id, item)| {
            json!({
                "id": id,
                "source_text": item.source_text,
                "user_text": item.user_text,
            })
        })
        .collect();

    let mut prompt = String::new();

    prompt.push_str("Task: Evaluate several language practice answers.\n\n");
    prompt.push_str(&format!("Source Language: {}\n", source_language));
    prompt.push_str(&format!("Target Language: {}\n\n", target_language));

    prompt.push_str("Items (JSON array; each item has an integer \"id\"):\n");
    prompt.push_str(&format!("{:#}", Value::Array(entries)));
    prompt.push_str("\n\n");

    prompt.push_str("Evaluate each item's user_text independently.\n");
    prompt.push_str(&evaluation_rules(target_language));
    prompt.push_str("\n\n");
    prompt.push_str(BATCH_OUTPUT_FORMAT);

    prompt
}

/// Encode `text` as a JSON string literal
fn json_string(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

fn evaluation_rules(target_language: &str) -> String {
    format!(
        "Rules:\n\
         - \"is_correct\": true if the answer is grammatically and contextually correct, otherwise false.\n\
         - \"corrected\": fix grammar only, keeping the learner's wording. If the answer is already correct, repeat it unchanged.\n\
         - \"better_expression\": the most natural way a native {target_language} speaker would say it, whether or not the answer was correct.\n\
         - \"explanation\": a concise rationale, at most 3 sentences."
    )
}

const SINGLE_OUTPUT_FORMAT: &str = r#"Output format (a single JSON object only, no additional text):
{
  "is_correct": true,
  "corrected": "string",
  "better_expression": "string",
  "explanation": "string"
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

const BATCH_OUTPUT_FORMAT: &str = r#"Output format (a single JSON object only, no additional text).
Keys are the item ids written as decimal strings, exactly as given ("0", "2", ...).
Each value has this shape:
{
  "0": {
    "is_correct": true,
    "corrected": "string",
    "better_expression": "string",
    "explanation": "string"
  }
}

Remember: Return ONLY valid JSON, one entry per item id, no markdown code blocks, no explanations."#;
