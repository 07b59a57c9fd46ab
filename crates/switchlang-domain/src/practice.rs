//! Practice items and the id-keyed maps used by batch evaluation

use crate::EvaluationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One sentence in a practice session
///
/// The item's identity is its index in the session's item sequence. That index
/// is the correlation key for batch evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PracticeItem {
    /// Sentence shown to the learner
    pub source_text: String,

    /// The learner's answer, overwritten on every edit
    pub user_input: String,

    /// Feedback, set at most once
    pub feedback: Option<EvaluationResult>,
}

impl PracticeItem {
    /// Create an unanswered item
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            user_input: String::new(),
            feedback: None,
        }
    }

    /// Whether the learner has typed something
    pub fn has_input(&self) -> bool {
        !self.user_input.trim().is_empty()
    }

    /// Whether the item is a candidate for evaluation
    pub fn is_eligible(&self) -> bool {
        self.has_input() && self.feedback.is_none()
    }
}

/// One entry of a batch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Sentence shown to the learner
    pub source_text: String,

    /// The learner's answer
    pub user_text: String,
}

/// Items to evaluate in one backend call, keyed by session index
pub type BatchRequest = BTreeMap<usize, BatchItem>;

/// Results of one batch call, keyed by session index
///
/// Keys are a subset of the request's keys. Missing keys mean the backend did
/// not return a usable entry for that item.
pub type BatchResponseMap = BTreeMap<usize, EvaluationResult>;

/// Collect the eligible items of `items`, keyed by their original index
pub fn eligible_items(items: &[PracticeItem]) -> BatchRequest {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_eligible())
        .map(|(idx, item)| {
            (
                idx,
                BatchItem {
                    source_text: item.source_text.clone(),
                    user_text: item.user_input.clone(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn answered(source: &str, answer: &str) -> PracticeItem {
        PracticeItem {
            source_text: source.to_string(),
            user_input: answer.to_string(),
            feedback: None,
        }
    }

    #[test]
    fn test_eligible_items_preserves_indices() {
        let items = vec![
            answered("a", "x"),
            answered("b", ""),
            PracticeItem {
                feedback: Some(EvaluationResult::error("done")),
                ..answered("c", "y")
            },
            answered("d", "z"),
        ];

        let request = eligible_items(&items);
        let ids: Vec<usize> = request.keys().copied().collect();
        assert_eq!(ids, vec![0, 3]);
        assert_eq!(request[&3].source_text, "d");
        assert_eq!(request[&3].user_text, "z");
    }

    #[test]
    fn test_whitespace_input_is_not_eligible() {
        let item = answered("a", "   \n");
        assert!(!item.has_input());
        assert!(!item.is_eligible());
    }

    proptest! {
        #[test]
        fn prop_eligible_ids_are_real_indices(
            inputs in proptest::collection::vec(("[a-z ]{0,6}", any::<bool>()), 0..20)
        ) {
            let items: Vec<PracticeItem> = inputs
                .iter()
                .map(|(text, evaluated)| PracticeItem {
                    source_text: "src".to_string(),
                    user_input: text.clone(),
                    feedback: evaluated.then(|| EvaluationResult::error("x")),
                })
                .collect();

            let request = eligible_items(&items);
            for id in request.keys() {
                prop_assert!(*id < items.len());
                prop_assert!(items[*id].is_eligible());
            }
            let expected = items.iter().filter(|i| i.is_eligible()).count();
            prop_assert_eq!(request.len(), expected);
        }
    }
}
