//! SwitchLang CLI library.
//!
//! Configuration management, command execution, output formatting and the
//! interactive practice loop behind the `switchlang` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
