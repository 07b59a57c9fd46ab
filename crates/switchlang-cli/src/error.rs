//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend error
    #[error("{0}")]
    Llm(#[from] switchlang_llm::LlmError),

    /// History store error
    #[error("History error: {0}")]
    Store(#[from] switchlang_store::StoreError),

    /// Tutor setup error
    #[error(transparent)]
    Tutor(#[from] switchlang_tutor::TutorError),

    /// Practice session misuse
    #[error("{0}")]
    Session(#[from] switchlang_tutor::SessionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor error
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
