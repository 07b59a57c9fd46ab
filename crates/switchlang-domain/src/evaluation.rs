//! Evaluation module - feedback for one learner answer

use serde::{Deserialize, Serialize};

/// Marker written into `corrected` and `better_expression` on failure paths
pub const ERROR_MARKER: &str = "Error";

/// Explanation carried by the empty-input sentinel
pub const NO_INPUT_EXPLANATION: &str = "No input provided.";

/// Feedback for one learner answer
///
/// All four fields are always present. Failure paths fill them with an error
/// marker instead of omitting them, so consumers never branch on missing keys.
///
/// The serialized form uses exactly these snake_case keys; it is both the
/// backend output contract and the history store's `feedback` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Whether the answer is grammatically and contextually correct
    pub is_correct: bool,

    /// Grammar-only fix of the answer; equals the answer when already correct
    pub corrected: String,

    /// Most natural native-speaker rendering
    pub better_expression: String,

    /// Concise rationale
    pub explanation: String,
}

impl EvaluationResult {
    /// Build an error-marked result carrying `diagnostic` as the explanation
    pub fn error(diagnostic: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            corrected: ERROR_MARKER.to_string(),
            better_expression: ERROR_MARKER.to_string(),
            explanation: diagnostic.into(),
        }
    }

    /// The constant result returned when the learner typed nothing
    pub fn no_input() -> Self {
        Self {
            is_correct: false,
            corrected: String::new(),
            better_expression: String::new(),
            explanation: NO_INPUT_EXPLANATION.to_string(),
        }
    }

    /// Whether this result came from a failure path
    pub fn is_error(&self) -> bool {
        !self.is_correct
            && self.corrected == ERROR_MARKER
            && self.better_expression == ERROR_MARKER
    }

    /// Whether this is the empty-input sentinel
    pub fn is_no_input(&self) -> bool {
        *self == Self::no_input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_is_marked() {
        let result = EvaluationResult::error("backend unavailable");
        assert!(result.is_error());
        assert!(!result.is_correct);
        assert_eq!(result.corrected, "Error");
        assert_eq!(result.better_expression, "Error");
        assert_eq!(result.explanation, "backend unavailable");
    }

    #[test]
    fn test_no_input_sentinel() {
        let result = EvaluationResult::no_input();
        assert!(result.is_no_input());
        assert!(!result.is_error());
        assert_eq!(result.explanation, NO_INPUT_EXPLANATION);
    }

    #[test]
    fn test_serialized_keys() {
        let result = EvaluationResult {
            is_correct: true,
            corrected: "x".to_string(),
            better_expression: "y".to_string(),
            explanation: "z".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(obj.contains_key("is_correct"));
        assert!(obj.contains_key("corrected"));
        assert!(obj.contains_key("better_expression"));
        assert!(obj.contains_key("explanation"));
    }

    #[test]
    fn test_correct_result_is_not_error() {
        let result = EvaluationResult {
            is_correct: true,
            corrected: "Error".to_string(),
            better_expression: "Error".to_string(),
            explanation: String::new(),
        };
        assert!(!result.is_error());
    }
}
