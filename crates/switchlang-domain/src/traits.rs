//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the tutor core and
//! infrastructure. Implementations live in other crates.

use crate::{HistoryRecord, NewHistoryRecord};

/// Trait for the generative-text backend
///
/// Implemented by the infrastructure layer (switchlang-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Identifier of the model this provider calls
    fn model_name(&self) -> &str;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}

/// Trait for the append-only practice history
///
/// Implemented by the infrastructure layer (switchlang-store)
pub trait HistoryStore {
    /// Error type for store operations
    type Error;

    /// Append a record, returning its identifier
    fn append(&mut self, record: NewHistoryRecord) -> Result<i64, Self::Error>;

    /// All records, most recent first
    fn query_all(&self) -> Result<Vec<HistoryRecord>, Self::Error>;
}
