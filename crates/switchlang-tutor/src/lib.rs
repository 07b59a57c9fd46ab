//! SwitchLang Tutor
//!
//! The evaluation orchestration layer: builds prompts for the generative-text
//! backend, interprets its responses, batches evaluations into one call and
//! degrades gracefully when the backend misbehaves.
//!
//! # Architecture
//!
//! ```text
//! PracticeSession → Tutor → Prompt → LlmProvider → Parser → EvaluationResult
//!                                                          → HistoryStore
//! ```
//!
//! # Key Features
//!
//! - **Single-item evaluation**: one round trip, never fails
//! - **Batch evaluation**: N eligible items in one backend call, results mapped
//!   back onto item indices, partial success tolerated
//! - **Expression generation**: practice sentences per difficulty tier
//! - **Explicit session state**: `PracticeSession` is owned by the caller; the
//!   tutor itself is stateless
//!
//! # Example Usage
//!
//! ```
//! use switchlang_tutor::{PracticeSession, Tutor, TutorConfig};
//! use switchlang_llm::MockProvider;
//! use switchlang_store::InMemoryHistoryStore;
//!
//! let llm = MockProvider::new(
//!     r#"{"0": {"is_correct": true, "corrected": "Hello.", "better_expression": "Hi there!", "explanation": "Fine."}}"#,
//! );
//! let tutor = Tutor::new(llm, TutorConfig::default());
//! let mut history = InMemoryHistoryStore::new();
//!
//! let mut session = PracticeSession::new("Korean", "English", vec!["안녕하세요".to_string()]);
//! session.set_input(0, "Hello.").unwrap();
//!
//! let outcome = session.check_pending(&tutor, &mut history);
//! assert_eq!(outcome.applied, vec![0]);
//! assert!(session.items()[0].feedback.as_ref().unwrap().is_correct);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod parser;
pub mod prompt;
mod session;
mod tutor;

#[cfg(test)]
mod tests;

pub use config::TutorConfig;
pub use error::{SessionError, TutorError};
pub use parser::{parse_batch_object, parse_evaluation_object, parse_line_list};
pub use prompt::{build_batch_evaluation_prompt, build_evaluation_prompt, build_expression_prompt};
pub use session::{BatchOutcome, PracticeSession, SessionProgress};
pub use tutor::Tutor;
