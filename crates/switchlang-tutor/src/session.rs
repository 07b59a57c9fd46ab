//! Caller-owned practice session state

use crate::error::SessionError;
use crate::parser::parse_line_list;
use crate::tutor::Tutor;
use std::fmt::Display;
use switchlang_domain::traits::{HistoryStore, LlmProvider};
use switchlang_domain::{
    eligible_items, BatchRequest, BatchResponseMap, DifficultyTier, EvaluationResult,
    NewHistoryRecord, PracticeItem,
};
use tracing::{debug, warn};

/// One practice session: a language pair and an ordered item sequence
///
/// Item indices are stable for the lifetime of the session and serve as the
/// batch correlation key. Feedback is set at most once per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    source_language: String,
    target_language: String,
    items: Vec<PracticeItem>,
}

/// Counts describing how far a session has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionProgress {
    /// Number of items
    pub total: usize,
    /// Items with a non-empty answer
    pub answered: usize,
    /// Items with feedback
    pub evaluated: usize,
    /// Items whose feedback says the answer was correct
    pub correct: usize,
}

/// What a batch check did to the session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Indices that received feedback
    pub applied: Vec<usize>,
    /// Indices that were sent but came back without usable feedback
    pub unresolved: Vec<usize>,
}

impl PracticeSession {
    /// Start a session over `source_texts`
    pub fn new(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        source_texts: Vec<String>,
    ) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            items: source_texts.into_iter().map(PracticeItem::new).collect(),
        }
    }

    /// Start a session from user-supplied text, one sentence per line
    pub fn from_custom_text(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        raw: &str,
    ) -> Self {
        Self::new(source_language, target_language, parse_line_list(raw))
    }

    /// Start a session from backend-generated expressions
    ///
    /// The session is empty when the backend produced nothing.
    pub fn generate<L>(
        tutor: &Tutor<L>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        count: usize,
        tier: DifficultyTier,
    ) -> Self
    where
        L: LlmProvider,
        L::Error: Display,
    {
        let source_language = source_language.into();
        let expressions = tutor.generate_expressions(&source_language, count, tier);
        Self::new(source_language, target_language, expressions)
    }

    /// Start over in a different language pair with the same source texts
    ///
    /// Answers and feedback are dropped; feedback given for one pair never
    /// carries over to another.
    pub fn with_languages(
        &self,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self::new(
            source_language,
            target_language,
            self.items.iter().map(|i| i.source_text.clone()).collect(),
        )
    }

    /// Language of the source sentences
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Language answers are written in
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// All items in order
    pub fn items(&self) -> &[PracticeItem] {
        &self.items
    }

    /// One item by index
    pub fn item(&self, index: usize) -> Option<&PracticeItem> {
        self.items.get(index)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the session has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Overwrite the answer for one item
    pub fn set_input(&mut self, index: usize, text: impl Into<String>) -> Result<(), SessionError> {
        let item = self.item_mut(index)?;
        if item.feedback.is_some() {
            return Err(SessionError::AlreadyEvaluated(index));
        }
        item.user_input = text.into();
        Ok(())
    }

    /// Indices of items eligible for evaluation
    pub fn pending_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_eligible())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// The batch request covering every eligible item
    pub fn batch_request(&self) -> BatchRequest {
        eligible_items(&self.items)
    }

    /// Set feedback for one item
    pub fn apply_feedback(&mut self, index: usize, result: EvaluationResult) -> Result<(), SessionError> {
        let item = self.item_mut(index)?;
        if item.feedback.is_some() {
            return Err(SessionError::AlreadyEvaluated(index));
        }
        item.feedback = Some(result);
        Ok(())
    }

    /// Apply batch results, returning the indices that received feedback
    ///
    /// Entries for unknown or already-evaluated items are ignored.
    pub fn apply_batch(&mut self, results: BatchResponseMap) -> Vec<usize> {
        let mut applied = Vec::new();
        for (index, result) in results {
            match self.apply_feedback(index, result) {
                Ok(()) => applied.push(index),
                Err(e) => debug!("Ignoring batch entry: {}", e),
            }
        }
        applied
    }

    /// Evaluate one item and record the result
    ///
    /// An empty answer returns the no-input sentinel without touching the
    /// item or the history, so the learner can still answer it.
    pub fn check_item<L, H>(
        &mut self,
        index: usize,
        tutor: &Tutor<L>,
        history: &mut H,
    ) -> Result<EvaluationResult, SessionError>
    where
        L: LlmProvider,
        L::Error: Display,
        H: HistoryStore,
        H::Error: Display,
    {
        let item = self
            .items
            .get(index)
            .ok_or(SessionError::NoSuchItem(index, self.items.len()))?;
        if item.feedback.is_some() {
            return Err(SessionError::AlreadyEvaluated(index));
        }
        if !item.has_input() {
            return Ok(EvaluationResult::no_input());
        }

        let result = tutor.evaluate(
            &item.source_text,
            &item.user_input,
            &self.source_language,
            &self.target_language,
        );

        self.apply_feedback(index, result.clone())?;
        self.record(index, history);
        Ok(result)
    }

    /// Evaluate every eligible item in one backend call and record results
    pub fn check_pending<L, H>(&mut self, tutor: &Tutor<L>, history: &mut H) -> BatchOutcome
    where
        L: LlmProvider,
        L::Error: Display,
        H: HistoryStore,
        H::Error: Display,
    {
        let request = self.batch_request();
        self.check_request(request, tutor, history)
    }

    /// Evaluate only the listed items, in one backend call
    ///
    /// Indices that are unknown or no longer eligible are skipped.
    pub fn check_only<L, H>(
        &mut self,
        indices: &[usize],
        tutor: &Tutor<L>,
        history: &mut H,
    ) -> BatchOutcome
    where
        L: LlmProvider,
        L::Error: Display,
        H: HistoryStore,
        H::Error: Display,
    {
        let mut request = self.batch_request();
        request.retain(|id, _| indices.contains(id));
        self.check_request(request, tutor, history)
    }

    fn check_request<L, H>(
        &mut self,
        request: BatchRequest,
        tutor: &Tutor<L>,
        history: &mut H,
    ) -> BatchOutcome
    where
        L: LlmProvider,
        L::Error: Display,
        H: HistoryStore,
        H::Error: Display,
    {
        if request.is_empty() {
            return BatchOutcome::default();
        }

        let results =
            tutor.evaluate_batch_request(&request, &self.source_language, &self.target_language);
        let applied = self.apply_batch(results);
        for &index in &applied {
            self.record(index, history);
        }

        let unresolved = request
            .keys()
            .copied()
            .filter(|id| !applied.contains(id))
            .collect();

        BatchOutcome { applied, unresolved }
    }

    /// Progress counters
    pub fn progress(&self) -> SessionProgress {
        self.items.iter().fold(
            SessionProgress {
                total: self.items.len(),
                ..SessionProgress::default()
            },
            |mut progress, item| {
                if item.has_input() {
                    progress.answered += 1;
                }
                if let Some(feedback) = &item.feedback {
                    progress.evaluated += 1;
                    if feedback.is_correct {
                        progress.correct += 1;
                    }
                }
                progress
            },
        )
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut PracticeItem, SessionError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(SessionError::NoSuchItem(index, len))
    }

    /// Append the item's feedback to history; failures are logged only
    fn record<H>(&self, index: usize, history: &mut H)
    where
        H: HistoryStore,
        H::Error: Display,
    {
        let Some(item) = self.items.get(index) else {
            return;
        };
        let Some(feedback) = &item.feedback else {
            return;
        };

        let serialized = match serde_json::to_string(feedback) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize feedback for item {}: {}", index, e);
                return;
            }
        };

        let record = NewHistoryRecord {
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
            source_text: item.source_text.clone(),
            user_input: item.user_input.clone(),
            feedback: serialized,
        };

        if let Err(e) = history.append(record) {
            warn!("Failed to save history for item {}: {}", index, e);
        }
    }
}
