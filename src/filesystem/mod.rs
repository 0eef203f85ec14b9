//! In-memory directory tree with per-file permissions.
//!
//! Directories live in an arena owned by [`FilesystemTree`] and are addressed
//! by [`DirId`]; files are owned directly by their directory.

mod error;
mod node;
mod permission;
mod tree;

pub use error::{Access, EntryKind, FsError};
pub use node::{DirId, DirectoryNode, FileNode, Listing};
pub use permission::Permission;
pub use tree::{FilesystemTree, ROOT_NAME};

pub(crate) use error::InvalidFormatSnafu;
