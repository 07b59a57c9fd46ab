//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use switchlang_domain::DifficultyTier;
use switchlang_llm::gemini::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use switchlang_tutor::TutorConfig;

/// Directory under the home directory holding config, history and line-editor state
const APP_DIR: &str = ".switchlang";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Practice defaults
    #[serde(default)]
    pub practice: PracticeSettings,

    /// Tutor behavior
    #[serde(default)]
    pub tutor: TutorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// History database
    #[serde(default)]
    pub history: HistorySettings,
}

/// Backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API base URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per request
    pub max_retries: u32,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

/// Practice defaults used when a command does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeSettings {
    /// Language of the source sentences
    pub source_language: String,

    /// Language answers are written in
    pub target_language: String,

    /// Difficulty tier name
    pub difficulty: String,

    /// Number of expressions per session
    pub count: usize,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// History database settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySettings {
    /// SQLite database path; `~/.switchlang/history.db` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(app_dir()?.join("config.toml"))
    }

    /// Configuration file path, honoring an explicit override.
    pub fn resolve_path(explicit: Option<&str>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        self.tutor.validate()?;
        self.difficulty()?;
        if self.practice.count == 0 {
            return Err(CliError::Config("practice.count must be greater than 0".into()));
        }
        if self.practice.count > self.tutor.max_expression_count {
            return Err(CliError::Config(format!(
                "practice.count ({}) cannot exceed tutor.max_expression_count ({})",
                self.practice.count, self.tutor.max_expression_count
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(CliError::Config("llm.model must not be empty".into()));
        }
        Ok(())
    }

    /// Configured difficulty tier.
    pub fn difficulty(&self) -> Result<DifficultyTier> {
        DifficultyTier::parse(&self.practice.difficulty).ok_or_else(|| {
            CliError::Config(format!(
                "Unknown difficulty '{}' (expected Beginner, Intermediate or Advanced)",
                self.practice.difficulty
            ))
        })
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CliError::Config(format!(
                "API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ))),
        }
    }

    /// History database path.
    pub fn history_path(&self) -> Result<PathBuf> {
        match &self.history.database {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dir()?.join("history.db")),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            source_language: "Korean".to_string(),
            target_language: "English".to_string(),
            difficulty: DifficultyTier::default().as_str().to_string(),
            count: 5,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// `~/.switchlang`
pub fn app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(APP_DIR))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
