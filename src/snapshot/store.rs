use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use super::codec::{DecodeError, SnapshotCodec};
use crate::filesystem::FilesystemTree;

pub const DEFAULT_SNAPSHOT_FILE: &str = "filesystem_data.txt";

/// Result of loading a snapshot. A missing file is not an error: it yields a
/// fresh tree and is reported separately from a successful restore.
#[derive(Debug)]
pub enum LoadOutcome {
    Restored(FilesystemTree),
    NoPriorSnapshot(FilesystemTree),
}

impl LoadOutcome {
    pub fn into_tree(self) -> FilesystemTree {
        match self {
            LoadOutcome::Restored(tree) | LoadOutcome::NoPriorSnapshot(tree) => tree,
        }
    }
}

/// Snapshot file on disk, read once at startup and rewritten on every save.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<LoadOutcome, SnapshotError> {
        debug!("Reading snapshot from {}", self.path.display());
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No snapshot at {}, starting fresh", self.path.display());
                return Ok(LoadOutcome::NoPriorSnapshot(FilesystemTree::new()));
            }
            Err(err) => {
                return Err(err).context(ReadSnafu {
                    path: self.path.clone(),
                });
            }
        };

        let contents = String::from_utf8(bytes).map_err(|_| SnapshotError::NotUtf8 {
            path: self.path.clone(),
        })?;
        let tree = SnapshotCodec::decode_str(&contents).context(DecodeSnafu {
            path: self.path.clone(),
        })?;
        info!(
            "Restored {} directories from {}",
            tree.directory_count(),
            self.path.display()
        );
        Ok(LoadOutcome::Restored(tree))
    }

    pub async fn save(&self, tree: &FilesystemTree) -> Result<(), SnapshotError> {
        let contents = SnapshotCodec::encode_to_string(tree);
        debug!(
            "Writing {} bytes of snapshot to {}",
            contents.len(),
            self.path.display()
        );
        fs::write(&self.path, contents.into_bytes())
            .await
            .0
            .context(WriteSnafu {
                path: self.path.clone(),
            })?;
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum SnapshotError {
    #[snafu(display("Failed to read snapshot {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Snapshot {} is not valid UTF-8", path.display()))]
    NotUtf8 { path: PathBuf },
    #[snafu(display("Failed to decode snapshot {}", path.display()))]
    DecodeError { path: PathBuf, source: DecodeError },
    #[snafu(display("Failed to save the file system to {}", path.display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}
