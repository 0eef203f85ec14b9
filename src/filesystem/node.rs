use std::collections::BTreeMap;

use derive_more::Display;

use super::error::{
    Access, AlreadyExistsSnafu, EntryKind, FsError, InvalidContentSnafu, NotFoundSnafu,
    PermissionDeniedSnafu, validate_name,
};
use super::Permission;

/// Stable handle of a directory inside a [`FilesystemTree`](super::FilesystemTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct DirId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    name: String,
    content: String,
    permissions: Permission,
}

impl FileNode {
    pub fn create(name: impl Into<String>) -> Self {
        FileNode {
            name: name.into(),
            content: String::new(),
            permissions: Permission::default(),
        }
    }

    /// Rebuilds a file exactly as it was persisted, bypassing permission checks.
    pub fn restore(name: impl Into<String>, permissions: Permission, content: impl Into<String>) -> Self {
        FileNode {
            name: name.into(),
            content: content.into(),
            permissions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permissions(&self) -> Permission {
        self.permissions
    }

    /// Raw content regardless of the read bit; used when persisting.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn write(&mut self, data: &str) -> Result<(), FsError> {
        if !self.permissions.can_write() {
            return PermissionDeniedSnafu {
                access: Access::Write,
                name: self.name.as_str(),
            }
            .fail();
        }
        // One snapshot record per line, so content must stay on a single line.
        if data.contains(['\n', '\r']) {
            return InvalidContentSnafu {
                name: self.name.as_str(),
            }
            .fail();
        }
        self.content.push_str(data);
        Ok(())
    }

    /// Returns the content; an empty string means the file is empty, not denied.
    pub fn read(&self) -> Result<&str, FsError> {
        if !self.permissions.can_read() {
            return PermissionDeniedSnafu {
                access: Access::Read,
                name: self.name.as_str(),
            }
            .fail();
        }
        Ok(&self.content)
    }

    pub fn set_permissions(&mut self, bits: &str) -> Result<Permission, FsError> {
        self.permissions = Permission::from_bits(bits)?;
        Ok(self.permissions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub files: Vec<(String, Permission)>,
    pub subdirectories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DirectoryNode {
    name: String,
    parent: Option<DirId>,
    files: BTreeMap<String, FileNode>,
    subdirectories: BTreeMap<String, DirId>,
}

impl DirectoryNode {
    pub(crate) fn new(name: impl Into<String>, parent: Option<DirId>) -> Self {
        DirectoryNode {
            name: name.into(),
            parent,
            files: BTreeMap::new(),
            subdirectories: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<DirId> {
        self.parent
    }

    pub fn create_file(&mut self, name: &str) -> Result<(), FsError> {
        self.insert_file(FileNode::create(name))
    }

    pub(crate) fn insert_file(&mut self, file: FileNode) -> Result<(), FsError> {
        validate_name(file.name())?;
        if self.files.contains_key(file.name()) {
            return AlreadyExistsSnafu {
                kind: EntryKind::File,
                name: file.name(),
            }
            .fail();
        }
        self.files.insert(file.name().to_string(), file);
        Ok(())
    }

    pub fn delete_file(&mut self, name: &str) -> Result<FileNode, FsError> {
        self.files.remove(name).ok_or_else(|| FsError::NotFound {
            kind: EntryKind::File,
            name: name.to_string(),
        })
    }

    pub fn file(&self, name: &str) -> Result<&FileNode, FsError> {
        self.files.get(name).ok_or_else(|| FsError::NotFound {
            kind: EntryKind::File,
            name: name.to_string(),
        })
    }

    pub fn file_mut(&mut self, name: &str) -> Result<&mut FileNode, FsError> {
        match self.files.get_mut(name) {
            Some(file) => Ok(file),
            None => NotFoundSnafu {
                kind: EntryKind::File,
                name,
            }
            .fail(),
        }
    }

    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.files.values()
    }

    pub fn subdirectories(&self) -> impl Iterator<Item = (&String, &DirId)> {
        self.subdirectories.iter()
    }

    pub fn has_subdirectory(&self, name: &str) -> bool {
        self.subdirectories.contains_key(name)
    }

    /// Links an already allocated directory under `name`.
    pub(crate) fn link_subdirectory(&mut self, name: &str, id: DirId) -> Result<(), FsError> {
        validate_name(name)?;
        if self.subdirectories.contains_key(name) {
            return AlreadyExistsSnafu {
                kind: EntryKind::Directory,
                name,
            }
            .fail();
        }
        self.subdirectories.insert(name.to_string(), id);
        Ok(())
    }

    pub fn list_contents(&self) -> Listing {
        Listing {
            files: self
                .files
                .values()
                .map(|file| (file.name().to_string(), file.permissions()))
                .collect(),
            subdirectories: self.subdirectories.keys().cloned().collect(),
        }
    }

    pub fn navigate_to(&self, name: &str) -> Option<DirId> {
        self.subdirectories.get(name).copied()
    }
}
