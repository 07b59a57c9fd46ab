//! Core Tutor implementation

use crate::config::TutorConfig;
use crate::parser::{parse_batch_object, parse_evaluation_object_with_snippet, parse_line_list};
use crate::prompt::{
    build_batch_evaluation_prompt, build_evaluation_prompt, build_expression_prompt,
    BATCH_EVALUATION_SCHEMA, EVALUATION_SCHEMA,
};
use std::collections::BTreeSet;
use std::fmt::Display;
use switchlang_domain::traits::LlmProvider;
use switchlang_domain::{
    eligible_items, BatchRequest, BatchResponseMap, DifficultyTier, EvaluationResult, PracticeItem,
};
use tracing::{debug, error, info};

/// The Tutor evaluates learner answers and sources practice material
///
/// It holds no session state: every operation is a function of its inputs
/// plus at most one backend call. None of its operations fail; failures are
/// encoded in the returned values.
pub struct Tutor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: TutorConfig,
}

impl<L> Tutor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Tutor
    pub fn new(llm_provider: L, config: TutorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Identifier of the backend model
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// The backend provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Evaluate one answer
    ///
    /// Empty answers short-circuit to `EvaluationResult::no_input()` without
    /// calling the backend.
    pub fn evaluate(
        &self,
        source_text: &str,
        user_text: &str,
        source_language: &str,
        target_language: &str,
    ) -> EvaluationResult {
        if user_text.trim().is_empty() {
            debug!("Empty answer, skipping backend call");
            return EvaluationResult::no_input();
        }

        let prompt = build_evaluation_prompt(source_text, user_text, source_language, target_language);
        debug!("Evaluation prompt length: {} chars", prompt.len());

        match self.call_llm(&prompt, Some(EVALUATION_SCHEMA)) {
            Ok(response) => {
                debug!("Evaluation response length: {} chars", response.len());
                parse_evaluation_object_with_snippet(&response, self.config.diagnostic_snippet_chars)
            }
            Err(e) => {
                error!("Evaluation call failed: {}", e);
                EvaluationResult::error(format!("Error during evaluation: {}", e))
            }
        }
    }

    /// Evaluate every eligible item of `items` in one backend call
    ///
    /// Returned keys are indices into `items`. Items the backend did not
    /// answer usably are absent and remain eligible for a later attempt.
    pub fn evaluate_batch(
        &self,
        items: &[PracticeItem],
        source_language: &str,
        target_language: &str,
    ) -> BatchResponseMap {
        let request = eligible_items(items);
        self.evaluate_batch_request(&request, source_language, target_language)
    }

    /// Evaluate a prepared batch request in one backend call
    pub fn evaluate_batch_request(
        &self,
        request: &BatchRequest,
        source_language: &str,
        target_language: &str,
    ) -> BatchResponseMap {
        if request.is_empty() {
            debug!("No eligible items, skipping batch call");
            return BatchResponseMap::new();
        }

        let expected_ids: BTreeSet<usize> = request.keys().copied().collect();
        let prompt = build_batch_evaluation_prompt(request, source_language, target_language);

        info!(
            "Evaluating batch of {} items with model '{}'",
            request.len(),
            self.model_name()
        );
        debug!("Batch prompt length: {} chars", prompt.len());

        let response = match self.call_llm(&prompt, Some(BATCH_EVALUATION_SCHEMA)) {
            Ok(response) => response,
            Err(e) => {
                error!("Batch evaluation call failed: {}", e);
                return BatchResponseMap::new();
            }
        };

        let results = parse_batch_object(&response, &expected_ids);

        info!(
            "Batch evaluation complete: {} resolved, {} unresolved",
            results.len(),
            expected_ids.len() - results.len()
        );

        results
    }

    /// Ask the backend for up to `count` practice expressions
    ///
    /// `count` is capped at `max_expression_count`. Backend failure yields an
    /// empty list.
    pub fn generate_expressions(
        &self,
        source_language: &str,
        count: usize,
        tier: DifficultyTier,
    ) -> Vec<String> {
        let count = count.min(self.config.max_expression_count);
        if count == 0 {
            return Vec::new();
        }

        let prompt = build_expression_prompt(source_language, count, tier);

        match self.call_llm(&prompt, None) {
            Ok(response) => {
                let mut expressions = parse_line_list(&response);
                expressions.truncate(count);
                info!(
                    "Generated {} {} expressions in {}",
                    expressions.len(),
                    tier,
                    source_language
                );
                expressions
            }
            Err(e) => {
                error!("Error generating expressions: {}", e);
                Vec::new()
            }
        }
    }

    /// Call the LLM provider
    fn call_llm(&self, prompt: &str, schema: Option<&str>) -> Result<String, L::Error> {
        match schema {
            Some(schema) if self.config.structured_output => {
                self.llm_provider.generate_structured(prompt, schema)
            }
            _ => self.llm_provider.generate(prompt),
        }
    }
}
