//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::commands::build_tutor;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::fmt::Display;
use switchlang_domain::traits::LlmProvider;
use switchlang_tutor::Tutor;

/// Execute the generate command.
pub fn execute_generate(args: GenerateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let tutor = build_tutor(config)?;
    let expressions = generate_with(&tutor, &args, config)?;

    if expressions.is_empty() {
        eprintln!("{}", formatter.warning("The backend returned no expressions"));
    }
    println!("{}", formatter.format_expressions(&expressions)?);

    Ok(())
}

/// Generate expressions, filling unset arguments from configuration.
pub fn generate_with<L>(tutor: &Tutor<L>, args: &GenerateArgs, config: &Config) -> Result<Vec<String>>
where
    L: LlmProvider,
    L::Error: Display,
{
    let count = args.count.unwrap_or(config.practice.count);
    let tier = match args.difficulty {
        Some(difficulty) => difficulty.into(),
        None => config.difficulty()?,
    };
    let source = args
        .source
        .as_deref()
        .unwrap_or(&config.practice.source_language);

    Ok(tutor.generate_expressions(source, count, tier))
}
