//! SwitchLang LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `switchlang-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Gemini REST API integration
//!
//! # Examples
//!
//! ```
//! use switchlang_llm::MockProvider;
//! use switchlang_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use switchlang_domain::traits::LlmProvider as LlmProviderTrait;
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider could not be set up
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Model name reported by `MockProvider`
pub const MOCK_MODEL_NAME: &str = "mock-model";

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Clones
/// share their response tables, call counter and prompt log.
///
/// # Examples
///
/// ```
/// use switchlang_llm::MockProvider;
/// use switchlang_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// assert_eq!(provider.generate("prompt2").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Option<String>,
    responses: Arc<Mutex<HashMap<String, String>>>,
    errors: Arc<Mutex<HashSet<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            errors: Arc::new(Mutex::new(HashSet::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockProvider whose every call fails unless a specific
    /// response was registered
    pub fn failing() -> Self {
        Self {
            default_response: None,
            ..Self::new("")
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.into(), response.into());
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.into());
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Reset the call count and prompt log
    pub fn reset_call_count(&self) {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn respond(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        if self
            .errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(prompt)
        {
            return Err(LlmError::Other("Mock error".to_string()));
        }

        if let Some(response) = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(prompt)
        {
            return Ok(response.clone());
        }

        self.default_response
            .clone()
            .ok_or_else(|| LlmError::Communication("Mock backend unavailable".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        MOCK_MODEL_NAME
    }

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.respond(prompt)
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.respond(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
        assert_eq!(provider.model_name(), MOCK_MODEL_NAME);
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").unwrap(), "world");
        assert_eq!(provider.generate("foo").unwrap(), "bar");
        assert_eq!(provider.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate_structured("prompt2", "{}").unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("bad prompt");
        assert!(matches!(result, Err(LlmError::Other(_))));
        // Failed calls still count as calls
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_failing() {
        let mut provider = MockProvider::failing();
        provider.add_response("known", "ok");

        assert!(matches!(
            provider.generate("anything"),
            Err(LlmError::Communication(_))
        ));
        assert_eq!(provider.generate("known").unwrap(), "ok");
    }

    #[test]
    fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
