use std::error::Error as _;
use std::io;

use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, error};

use crate::application::RuntimeConfig;
use crate::cli::Cli;
use crate::config::{Settings, SettingsError};
use crate::filesystem::FilesystemTree;
use crate::shell::Session;
use crate::snapshot::{LoadOutcome, SnapshotError, SnapshotStore};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let settings = Settings::read(&cli.config).await.context(SettingsSnafu)?;
        let config = RuntimeConfig::from_sources(&cli, settings);
        debug!("Resolved runtime config: {:?}", config);

        let color = supports_color::on(Stream::Stdout).is_some();
        colored::control::set_override(color);

        let store = SnapshotStore::new(&config.snapshot_path);
        let startup = Startup::from_load(store.load().await, config.save_on_exit);
        println!("{}", startup.notice);

        let mut session = Session::new(startup.tree, store, startup.save_on_exit).with_color(color);
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        session
            .run(stdin.lock(), &mut stdout)
            .await
            .context(ConsoleSnafu)?;

        Ok(())
    }
}

/// Tree and save policy a session starts with, derived from the snapshot load.
///
/// A snapshot that cannot be read or decoded is reported and replaced by an
/// empty tree. Saving on exit is then switched off so the unreadable file
/// survives the session unless the user saves explicitly.
#[derive(Debug)]
pub struct Startup {
    pub tree: FilesystemTree,
    pub save_on_exit: bool,
    pub notice: String,
}

impl Startup {
    pub fn from_load(loaded: Result<LoadOutcome, SnapshotError>, save_on_exit: bool) -> Self {
        match loaded {
            Ok(LoadOutcome::Restored(tree)) => Startup {
                tree,
                save_on_exit,
                notice: "File system loaded.".to_string(),
            },
            Ok(LoadOutcome::NoPriorSnapshot(tree)) => Startup {
                tree,
                save_on_exit,
                notice: "No saved file system found.".to_string(),
            },
            Err(err) => {
                error!("Snapshot load failed: {:?}", err);
                let cause = err
                    .source()
                    .map(|source| format!(": {source}"))
                    .unwrap_or_default();
                Startup {
                    tree: FilesystemTree::new(),
                    save_on_exit: false,
                    notice: format!(
                        "{err}{cause}\nStarting with an empty file system; it will not be saved on exit."
                    ),
                }
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading settings"))]
    SettingsError { source: SettingsError },
    #[snafu(display("Lost access to the console"))]
    ConsoleError { source: io::Error },
}
