//! Command implementations.

pub mod check;
pub mod config;
pub mod generate;
pub mod history;
pub mod models;
pub mod practice;

pub use self::check::execute_check;
pub use self::config::execute_config;
pub use self::generate::execute_generate;
pub use self::history::execute_history;
pub use self::models::execute_models;
pub use self::practice::execute_practice;

use crate::config::Config;
use crate::error::Result;
use std::fs;
use std::time::Duration;
use switchlang_llm::GeminiProvider;
use switchlang_store::SqliteHistoryStore;
use switchlang_tutor::Tutor;
use tracing::debug;

/// Build the backend provider from configuration.
///
/// Fails when the API key environment variable is unset.
pub fn build_provider(config: &Config) -> Result<GeminiProvider> {
    let provider = GeminiProvider::new(config.api_key()?, config.llm.model.clone())?
        .with_endpoint(config.llm.endpoint.clone())
        .with_max_retries(config.llm.max_retries)
        .with_timeout(Duration::from_secs(config.llm.timeout_secs))?;
    debug!("Using model '{}' at {}", config.llm.model, config.llm.endpoint);
    Ok(provider)
}

/// Build a tutor backed by the configured provider.
pub fn build_tutor(config: &Config) -> Result<Tutor<GeminiProvider>> {
    Ok(Tutor::new(build_provider(config)?, config.tutor.clone()))
}

/// Open the history database, creating its directory if needed.
pub fn open_history(config: &Config) -> Result<SqliteHistoryStore> {
    let path = config.history_path()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    debug!("Opening history database at {}", path.display());
    Ok(SqliteHistoryStore::new(&path)?)
}
