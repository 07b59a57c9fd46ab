//! History command implementation.

use crate::cli::HistoryArgs;
use crate::commands::open_history;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the history command.
pub fn execute_history(args: HistoryArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    if args.limit == 0 {
        return Err(CliError::InvalidInput("--limit must be greater than 0".to_string()));
    }

    let store = open_history(config)?;
    let records = store.query_recent(args.limit)?;

    println!("{}", formatter.format_history(&records)?);

    Ok(())
}
