use std::collections::HashMap;

use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::filesystem::{DirId, FileNode, FilesystemTree, FsError, Permission, ROOT_NAME};

const DIR_TAG: &str = "DIR";
const FILE_TAG: &str = "FILE";

/// Line-oriented text form of a [`FilesystemTree`].
///
/// ```text
/// DIR root/projects
/// FILE root/projects/notes.txt 110 Hello world
/// ```
///
/// File content is everything after the single space that follows the
/// permission field. Content that itself starts with a space loses that space
/// on decode, and content containing a newline cannot be represented.
pub struct SnapshotCodec;

impl SnapshotCodec {
    /// Flattens the tree in pre-order: a directory's files first, then each
    /// subdirectory's `DIR` line followed by its own contents. The root is implicit.
    pub fn encode(tree: &FilesystemTree) -> Vec<String> {
        let mut lines = Vec::new();
        Self::encode_directory(tree, tree.root(), ROOT_NAME, &mut lines);
        lines
    }

    fn encode_directory(tree: &FilesystemTree, id: DirId, path: &str, lines: &mut Vec<String>) {
        let directory = tree.directory(id);

        for file in directory.files() {
            lines.push(format!(
                "{FILE_TAG} {path}/{} {} {}",
                file.name(),
                file.permissions(),
                file.content()
            ));
        }

        for (name, child) in directory.subdirectories() {
            let child_path = format!("{path}/{name}");
            lines.push(format!("{DIR_TAG} {child_path}"));
            Self::encode_directory(tree, *child, &child_path, lines);
        }
    }

    pub fn encode_to_string(tree: &FilesystemTree) -> String {
        Self::encode(tree)
            .into_iter()
            .map(|line| line + "\n")
            .collect()
    }

    pub fn decode<I, S>(lines: I) -> Result<FilesystemTree, DecodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = FilesystemTree::new();
        let mut directories: HashMap<String, DirId> = HashMap::new();
        directories.insert(ROOT_NAME.to_string(), tree.root());

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let line_number = index + 1;

            match Record::parse(line, line_number)? {
                Some(Record::Directory { path }) => {
                    let (parent, name) = resolve_parent(&directories, path, line_number)?;
                    let id = tree
                        .create_directory_in(parent, name)
                        .context(EntrySnafu { line: line_number, path })?;
                    directories.insert(path.to_string(), id);
                }
                Some(Record::File {
                    path,
                    permissions,
                    content,
                }) => {
                    let (parent, name) = resolve_parent(&directories, path, line_number)?;
                    let permissions = Permission::from_bits(permissions)
                        .context(InvalidPermissionSnafu { line: line_number })?;
                    tree.insert_file_in(parent, FileNode::restore(name, permissions, content))
                        .context(EntrySnafu { line: line_number, path })?;
                }
                None => {}
            }
        }

        debug!("Decoded snapshot with {} directories", tree.directory_count());
        Ok(tree)
    }

    pub fn decode_str(contents: &str) -> Result<FilesystemTree, DecodeError> {
        Self::decode(contents.lines())
    }
}

enum Record<'a> {
    Directory {
        path: &'a str,
    },
    File {
        path: &'a str,
        permissions: &'a str,
        content: &'a str,
    },
}

impl<'a> Record<'a> {
    fn parse(line: &'a str, line_number: usize) -> Result<Option<Self>, DecodeError> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let (tag, rest) = line.split_once(' ').unwrap_or((line, ""));
        match tag {
            DIR_TAG => {
                if rest.is_empty() || rest.contains(' ') {
                    return MalformedRecordSnafu {
                        line: line_number,
                        record: line,
                    }
                    .fail();
                }
                Ok(Some(Record::Directory { path: rest }))
            }
            FILE_TAG => {
                let Some((path, fields)) = rest.split_once(' ') else {
                    return MalformedRecordSnafu {
                        line: line_number,
                        record: line,
                    }
                    .fail();
                };
                // A missing separator after the permission field means empty content.
                let (permissions, content) = fields.split_once(' ').unwrap_or((fields, ""));
                Ok(Some(Record::File {
                    path,
                    permissions,
                    content,
                }))
            }
            _ => {
                warn!("Skipping unknown snapshot record on line {}: {:?}", line_number, line);
                Ok(None)
            }
        }
    }
}

fn resolve_parent<'a>(
    directories: &HashMap<String, DirId>,
    path: &'a str,
    line_number: usize,
) -> Result<(DirId, &'a str), DecodeError> {
    let Some((parent_path, name)) = path.rsplit_once('/') else {
        return DanglingReferenceSnafu {
            line: line_number,
            parent: "",
        }
        .fail();
    };

    match directories.get(parent_path) {
        Some(parent) => Ok((*parent, name)),
        None => DanglingReferenceSnafu {
            line: line_number,
            parent: parent_path,
        }
        .fail(),
    }
}

#[derive(Debug, Snafu)]
pub enum DecodeError {
    #[snafu(display("Line {line}: parent directory '{parent}' was not declared earlier"))]
    DanglingReference { line: usize, parent: String },
    #[snafu(display("Line {line}: malformed record {record:?}"))]
    MalformedRecord { line: usize, record: String },
    #[snafu(display("Line {line}: invalid permission field"))]
    InvalidPermission { line: usize, source: FsError },
    #[snafu(display("Line {line}: cannot restore '{path}'"))]
    EntryError {
        line: usize,
        path: String,
        source: FsError,
    },
}
