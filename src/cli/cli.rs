use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;
use crate::config::DEFAULT_SETTINGS_FILE;

/// Interactive in-memory filesystem with a flat snapshot file.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Snapshot file to load at startup and save to
    #[clap(long, short)]
    pub snapshot: Option<PathBuf>,

    /// Optional YAML settings file
    #[clap(long, short, default_value = DEFAULT_SETTINGS_FILE)]
    pub config: PathBuf,

    /// Do not write the snapshot when the session ends
    #[clap(long)]
    pub no_save_on_exit: bool,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
