//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use switchlang_domain::DifficultyTier;

/// SwitchLang - Practice writing in a language you are learning.
#[derive(Debug, Parser)]
#[command(name = "switchlang")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SWITCHLANG_CONFIG")]
    pub config: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate practice expressions in the source language
    Generate(GenerateArgs),

    /// Evaluate one answer and record it in history
    Check(CheckArgs),

    /// Start an interactive practice session (default)
    Practice(PracticeArgs),

    /// Show recently evaluated answers
    History(HistoryArgs),

    /// List models available to the configured API key
    Models,

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Number of expressions
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Difficulty tier
    #[arg(short, long, value_enum)]
    pub difficulty: Option<DifficultyArg>,

    /// Language the expressions are written in
    #[arg(short, long)]
    pub source: Option<String>,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Sentence that was shown
    pub source_text: String,

    /// The answer to evaluate
    pub answer: String,

    /// Language of the source sentence
    #[arg(short, long)]
    pub source: Option<String>,

    /// Language of the answer
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Arguments for the practice command.
#[derive(Debug, Default, Parser)]
pub struct PracticeArgs {
    /// Number of expressions to generate
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Difficulty tier
    #[arg(short, long, value_enum)]
    pub difficulty: Option<DifficultyArg>,

    /// Language of the source sentences
    #[arg(short, long)]
    pub source: Option<String>,

    /// Language answers are written in
    #[arg(short, long)]
    pub target: Option<String>,

    /// Practice sentences from a file (one per line) instead of generating them
    #[arg(long)]
    pub custom_file: Option<String>,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// Maximum number of records
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Difficulty argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DifficultyArg {
    /// Short survival phrases and greetings
    Beginner,
    /// Casual conversational sentences
    Intermediate,
    /// Idiomatic expressions
    Advanced,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<DifficultyArg> for DifficultyTier {
    fn from(difficulty: DifficultyArg) -> Self {
        match difficulty {
            DifficultyArg::Beginner => DifficultyTier::Beginner,
            DifficultyArg::Intermediate => DifficultyTier::Intermediate,
            DifficultyArg::Advanced => DifficultyTier::Advanced,
        }
    }
}
