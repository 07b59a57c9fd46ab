//! Error types for the tutor
//!
//! Evaluation and generation never fail; these cover configuration and
//! misuse of a practice session.

use thiserror::Error;

/// Errors raised while setting up the tutor
#[derive(Error, Debug)]
pub enum TutorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised by `PracticeSession` operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Index does not name an item
    #[error("No practice item {0} (session has {1} items)")]
    NoSuchItem(usize, usize),

    /// Feedback is immutable once set
    #[error("Practice item {0} has already been evaluated")]
    AlreadyEvaluated(usize),
}
