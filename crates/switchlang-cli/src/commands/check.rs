//! Check command implementation.

use crate::cli::CheckArgs;
use crate::commands::{build_tutor, open_history};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::fmt::Display;
use switchlang_domain::traits::{HistoryStore, LlmProvider};
use switchlang_domain::EvaluationResult;
use switchlang_tutor::{PracticeSession, Tutor};

/// Execute the check command.
pub fn execute_check(args: CheckArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let tutor = build_tutor(config)?;
    let mut history = open_history(config)?;

    let result = check_with(&tutor, &mut history, args, config)?;
    println!("{}", formatter.format_evaluation(&result)?);

    Ok(())
}

/// Evaluate one answer through a single-item session so it lands in history.
pub fn check_with<L, H>(
    tutor: &Tutor<L>,
    history: &mut H,
    args: CheckArgs,
    config: &Config,
) -> Result<EvaluationResult>
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

    let mut session = PracticeSession::new(source, target, vec![args.source_text]);
    session.set_input(0, args.answer)?;
    Ok(session.check_item(0, tutor, history)?)
}
