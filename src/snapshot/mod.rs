//! Flat-file persistence of the directory tree.

mod codec;
mod store;

pub use codec::{DecodeError, SnapshotCodec};
pub use store::{DEFAULT_SNAPSHOT_FILE, LoadOutcome, SnapshotError, SnapshotStore};
