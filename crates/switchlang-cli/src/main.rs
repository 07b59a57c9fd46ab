//! SwitchLang CLI - practice writing in a language you are learning.

use clap::Parser;
use switchlang_cli::cli::PracticeArgs;
use switchlang_cli::commands;
use switchlang_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> switchlang_cli::Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None => commands::execute_practice(PracticeArgs::default(), &config, &formatter)?,
        Some(Command::Practice(args)) => commands::execute_practice(args, &config, &formatter)?,
        Some(Command::Generate(args)) => commands::execute_generate(args, &config, &formatter)?,
        Some(Command::Check(args)) => commands::execute_check(args, &config, &formatter)?,
        Some(Command::History(args)) => commands::execute_history(args, &config, &formatter)?,
        Some(Command::Models) => commands::execute_models(&config, &formatter)?,
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, &config_path, &formatter)?
        }
    }

    Ok(())
}
