use derive_more::Display;
use snafu::Snafu;

/// Which namespace of a directory an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    #[display("File")]
    File,
    #[display("Directory")]
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Access {
    #[display("Read")]
    Read,
    #[display("Write")]
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FsError {
    #[snafu(display("{kind} {name} already exists."))]
    AlreadyExists { kind: EntryKind, name: String },
    #[snafu(display("{kind} {name} not found."))]
    NotFound { kind: EntryKind, name: String },
    #[snafu(display("{access} permission denied for file {name}."))]
    PermissionDenied { access: Access, name: String },
    #[snafu(display(
        "Invalid permission format '{input}'. Use a 3-bit string (e.g., 111)."
    ))]
    InvalidFormat { input: String },
    #[snafu(display("Invalid name '{name}'. Names must be non-empty and contain no '/' or spaces."))]
    InvalidName { name: String },
    #[snafu(display("Content for file {name} cannot contain line breaks."))]
    InvalidContent { name: String },
    #[snafu(display("Already at root directory."))]
    AlreadyAtRoot,
}

pub(crate) fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() || name.contains('/') || name.contains(char::is_whitespace) {
        return InvalidNameSnafu { name }.fail();
    }
    Ok(())
}
