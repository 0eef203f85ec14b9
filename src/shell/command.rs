/// One parsed console line.
///
/// A line is split at most twice: the first space separates the verb, the
/// second separates the first argument from a trailing argument that keeps
/// every remaining character, spaces included. Missing arguments are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MakeDirectory(String),
    Touch(String),
    Remove(String),
    List,
    ChangeDirectory(String),
    Back,
    Write { name: String, data: String },
    Read(String),
    Chmod { name: String, bits: String },
    Save,
    PrintWorkingDirectory,
    Exit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let (first, second) = rest.split_once(' ').unwrap_or((rest, ""));
        let first = first.to_string();

        match verb {
            "" if rest.is_empty() => Command::Empty,
            "mkdir" => Command::MakeDirectory(first),
            "touch" => Command::Touch(first),
            "rm" => Command::Remove(first),
            "ls" => Command::List,
            "cd" => Command::ChangeDirectory(first),
            "back" => Command::Back,
            "write" => Command::Write {
                name: first,
                data: second.to_string(),
            },
            "read" => Command::Read(first),
            "chmod" => Command::Chmod {
                name: first,
                bits: second.to_string(),
            },
            "save" => Command::Save,
            "pwd" => Command::PrintWorkingDirectory,
            "exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub const USAGE: &str = "Commands: mkdir <name>, touch <name>, rm <name>, ls, cd <name>, back, \
write <file> <data>, read <file>, chmod <file> <perm>, pwd, save, exit";
