//! Practice command implementation.

use crate::cli::PracticeArgs;
use crate::commands::{build_tutor, open_history};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::repl::{self, PracticeContext};
use std::fmt::Display;
use std::fs;
use switchlang_domain::traits::{HistoryStore, LlmProvider};
use switchlang_tutor::{PracticeSession, Tutor};
use tracing::info;

/// Execute the practice command.
pub fn execute_practice(args: PracticeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let tutor = build_tutor(config)?;
    let history = open_history(config)?;

    let mut context = start_session(tutor, history, args, config)?;
    if context.session().is_empty() {
        eprintln!(
            "{}",
            formatter.warning("No practice items yet. Type 'new' to generate expressions.")
        );
    }

    repl::run_practice(&mut context, formatter)
}

/// Build the first session from a custom file or from generated expressions.
pub fn start_session<L, H>(
    tutor: Tutor<L>,
    history: H,
    args: PracticeArgs,
    config: &Config,
) -> Result<PracticeContext<L, H>>
where
    L: LlmProvider,
    L::Error: Display,
    H: HistoryStore,
    H::Error: Display,
{
    let source = args
        .source
        .unwrap_or_else(|| config.practice.source_language.clone());
    let target = args
        .target
        .unwrap_or_else(|| config.practice.target_language.clone());
    let count = args.count.unwrap_or(config.practice.count);
    let tier = match args.difficulty {
        Some(difficulty) => difficulty.into(),
        None => config.difficulty()?,
    };

    let session = match args.custom_file {
        Some(path) => {
            let raw = fs::read_to_string(&path)?;
            let session = PracticeSession::from_custom_text(source, target, &raw);
            info!("Loaded {} practice items from {}", session.len(), path);
            session
        }
        None => PracticeSession::generate(&tutor, source, target, count, tier),
    };

    Ok(PracticeContext::new(tutor, history, session, tier, count))
}
