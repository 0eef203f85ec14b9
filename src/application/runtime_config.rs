use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Settings;
use crate::snapshot::DEFAULT_SNAPSHOT_FILE;

/// Effective settings: command line flags win over the settings file, which
/// wins over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub snapshot_path: PathBuf,
    pub save_on_exit: bool,
}

impl RuntimeConfig {
    pub fn from_sources(cli: &Cli, settings: Settings) -> Self {
        let snapshot_path = cli
            .snapshot
            .clone()
            .or(settings.snapshot)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_FILE));
        let save_on_exit = !cli.no_save_on_exit && settings.save_on_exit.unwrap_or(true);

        Self {
            snapshot_path,
            save_on_exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("filesim").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn built_in_defaults_apply_when_nothing_is_set() {
        let config = RuntimeConfig::from_sources(&cli(&[]), Settings::default());
        assert_eq!(config.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_FILE));
        assert!(config.save_on_exit);
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let settings = Settings {
            snapshot: Some(PathBuf::from("from_settings.txt")),
            save_on_exit: Some(false),
        };
        let config = RuntimeConfig::from_sources(&cli(&[]), settings);
        assert_eq!(config.snapshot_path, PathBuf::from("from_settings.txt"));
        assert!(!config.save_on_exit);
    }

    #[test]
    fn cli_overrides_settings_file() {
        let settings = Settings {
            snapshot: Some(PathBuf::from("from_settings.txt")),
            save_on_exit: Some(true),
        };
        let config = RuntimeConfig::from_sources(
            &cli(&["--snapshot", "from_cli.txt", "--no-save-on-exit"]),
            settings,
        );
        assert_eq!(config.snapshot_path, PathBuf::from("from_cli.txt"));
        assert!(!config.save_on_exit);
    }
}
