//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init { force } => {
            if init_config(path, force)? {
                println!(
                    "{}",
                    formatter.success(&format!("Wrote default configuration to {}", path.display()))
                );
            } else {
                println!(
                    "{}",
                    formatter.warning(&format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    ))
                );
            }
            Ok(())
        }
    }
}

/// Write a default configuration file, returning whether it was written.
fn init_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Config::default().save_to(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[practice]\ncount = 9\n").unwrap();

        assert!(!init_config(&path, false).unwrap());
        assert_eq!(Config::load_from(&path).unwrap().practice.count, 9);

        assert!(init_config(&path, true).unwrap());
        assert_eq!(Config::load_from(&path).unwrap().practice.count, 5);
    }

    #[test]
    fn test_init_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("config.toml");
        assert!(init_config(&path, false).unwrap());
        assert!(path.exists());
    }
}
