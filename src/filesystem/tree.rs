use tracing::debug;

use super::error::{AlreadyAtRootSnafu, EntryKind, FsError, validate_name};
use super::node::{DirId, DirectoryNode, FileNode, Listing};
use super::Permission;

/// Name of the implicit top-level directory, also the first segment of every persisted path.
pub const ROOT_NAME: &str = "root";

const ROOT_ID: DirId = DirId(0);

/// Owns every directory of the simulated filesystem in a flat arena.
///
/// Directories reference their children by [`DirId`] and their parent through a
/// non-owning handle, so the cursor stays valid however the arena grows.
/// Directories are never removed, which keeps every issued `DirId` live.
#[derive(Debug, Clone)]
pub struct FilesystemTree {
    directories: Vec<DirectoryNode>,
    cursor: DirId,
}

impl Default for FilesystemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesystemTree {
    pub fn new() -> Self {
        FilesystemTree {
            directories: vec![DirectoryNode::new(ROOT_NAME, None)],
            cursor: ROOT_ID,
        }
    }

    pub fn root(&self) -> DirId {
        ROOT_ID
    }

    pub fn current(&self) -> DirId {
        self.cursor
    }

    pub fn is_at_root(&self) -> bool {
        self.cursor == ROOT_ID
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree. Use [`get_directory`](Self::get_directory)
    /// for handles of unknown origin.
    pub fn directory(&self, id: DirId) -> &DirectoryNode {
        &self.directories[id.0]
    }

    pub fn get_directory(&self, id: DirId) -> Option<&DirectoryNode> {
        self.directories.get(id.0)
    }

    fn directory_mut(&mut self, id: DirId) -> &mut DirectoryNode {
        &mut self.directories[id.0]
    }

    pub fn current_directory(&self) -> &DirectoryNode {
        self.directory(self.cursor)
    }

    fn current_directory_mut(&mut self) -> &mut DirectoryNode {
        self.directory_mut(self.cursor)
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Creates an empty directory named `name` inside `parent`.
    pub fn create_directory_in(&mut self, parent: DirId, name: &str) -> Result<DirId, FsError> {
        validate_name(name)?;
        if self.directory(parent).has_subdirectory(name) {
            return Err(FsError::AlreadyExists {
                kind: EntryKind::Directory,
                name: name.to_string(),
            });
        }

        let id = DirId(self.directories.len());
        self.directories.push(DirectoryNode::new(name, Some(parent)));
        self.directory_mut(parent).link_subdirectory(name, id)?;
        debug!("Created directory '{}' as {} under {}", name, id, parent);
        Ok(id)
    }

    pub(crate) fn insert_file_in(&mut self, parent: DirId, file: FileNode) -> Result<(), FsError> {
        self.directory_mut(parent).insert_file(file)
    }

    /// Persisted-form path of a directory, e.g. `root/projects/src`.
    pub fn path_of(&self, id: DirId) -> String {
        let mut segments = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            let directory = self.directory(current);
            segments.push(directory.name());
            next = directory.parent();
        }
        segments.reverse();
        segments.join("/")
    }

    pub fn change_directory(&mut self, name: &str) -> Result<(), FsError> {
        match self.current_directory().navigate_to(name) {
            Some(id) => {
                debug!("Moving cursor from {} to {}", self.cursor, id);
                self.cursor = id;
                Ok(())
            }
            None => Err(FsError::NotFound {
                kind: EntryKind::Directory,
                name: name.to_string(),
            }),
        }
    }

    /// Jumps straight back to the root; there is no parent stack.
    pub fn change_to_root(&mut self) -> Result<(), FsError> {
        if self.is_at_root() {
            return AlreadyAtRootSnafu.fail();
        }
        self.cursor = ROOT_ID;
        Ok(())
    }

    pub fn create_directory(&mut self, name: &str) -> Result<DirId, FsError> {
        self.create_directory_in(self.cursor, name)
    }

    pub fn create_file(&mut self, name: &str) -> Result<(), FsError> {
        self.current_directory_mut().create_file(name)
    }

    pub fn delete_file(&mut self, name: &str) -> Result<(), FsError> {
        self.current_directory_mut().delete_file(name).map(|_| ())
    }

    pub fn write_file(&mut self, name: &str, data: &str) -> Result<(), FsError> {
        self.current_directory_mut().file_mut(name)?.write(data)
    }

    pub fn read_file(&self, name: &str) -> Result<&str, FsError> {
        self.current_directory().file(name)?.read()
    }

    pub fn set_file_permissions(&mut self, name: &str, bits: &str) -> Result<Permission, FsError> {
        self.current_directory_mut()
            .file_mut(name)?
            .set_permissions(bits)
    }

    pub fn list_contents(&self) -> Listing {
        self.current_directory().list_contents()
    }
}
