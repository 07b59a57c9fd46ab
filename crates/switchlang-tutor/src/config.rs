//! Configuration for the Tutor

use crate::error::TutorError;
use serde::{Deserialize, Serialize};

/// Configuration for the Tutor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Upper bound on expressions requested in one call
    pub max_expression_count: usize,

    /// Ask the backend for JSON output mode on evaluation calls
    pub structured_output: bool,

    /// Characters of raw backend text kept in error diagnostics
    pub diagnostic_snippet_chars: usize,
}

impl TutorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), TutorError> {
        if self.max_expression_count == 0 {
            return Err(TutorError::Config(
                "max_expression_count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, TutorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| TutorError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, TutorError> {
        toml::to_string_pretty(self)
            .map_err(|e| TutorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            max_expression_count: 30,
            structured_output: true,
            diagnostic_snippet_chars: 200,
        }
    }
}
