//! SwitchLang Domain Layer
//!
//! This crate contains the data model shared by every other SwitchLang crate
//! and the trait interfaces for the two external collaborators: the
//! generative-text backend and the history store.
//!
//! ## Key Concepts
//!
//! - **Practice item**: a source sentence, the learner's answer, and the
//!   feedback once it has been evaluated
//! - **Evaluation result**: four always-present fields describing feedback
//! - **Difficulty tier**: Beginner, Intermediate or Advanced practice material
//! - **Batch request / response map**: items keyed by their session index
//! - **History record**: an append-only log entry for one evaluated answer
//!
//! ## Architecture
//!
//! - No I/O and no runtime dependencies beyond `serde`
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod difficulty;
pub mod evaluation;
pub mod history;
pub mod practice;
pub mod traits;

// Re-exports for convenience
pub use difficulty::DifficultyTier;
pub use evaluation::EvaluationResult;
pub use history::{HistoryRecord, NewHistoryRecord};
pub use practice::{eligible_items, BatchItem, BatchRequest, BatchResponseMap, PracticeItem};
