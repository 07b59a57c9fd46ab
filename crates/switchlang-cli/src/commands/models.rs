//! Models command implementation.

use crate::commands::build_provider;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tracing::info;

/// Execute the models command.
pub fn execute_models(config: &Config, formatter: &Formatter) -> Result<()> {
    let provider = build_provider(config)?;
    let models = provider.list_models()?;
    info!("{} models support content generation", models.len());

    println!("{}", formatter.format_models(&models)?);

    Ok(())
}
