use std::io::{self, BufRead, Write};

use colored::Colorize;
use tracing::{debug, error, info};

use super::command::{Command, USAGE};
use crate::filesystem::{FilesystemTree, Listing};
use crate::snapshot::SnapshotStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive session: owns the tree, executes parsed commands against the
/// current directory and renders every outcome as console text.
pub struct Session {
    tree: FilesystemTree,
    store: SnapshotStore,
    save_on_exit: bool,
    color: bool,
}

impl Session {
    pub fn new(tree: FilesystemTree, store: SnapshotStore, save_on_exit: bool) -> Self {
        Session {
            tree,
            store,
            save_on_exit,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn tree(&self) -> &FilesystemTree {
        &self.tree
    }

    /// Reads commands until `exit` or end of input. Command failures are
    /// reported to `output` and never end the loop; only console I/O errors do.
    pub async fn run<R: BufRead, W: Write>(&mut self, mut input: R, output: &mut W) -> io::Result<()> {
        writeln!(output, "File System Simulation")?;
        writeln!(output, "{USAGE}")?;

        let mut line = String::new();
        loop {
            self.prompt(output)?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                debug!("Input closed, leaving session");
                writeln!(output)?;
                self.finish(output).await?;
                return Ok(());
            }

            if self.execute(Command::parse(&line), output).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn prompt<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let name = self.tree.current_directory().name();
        if self.color {
            write!(output, "{}> ", name.bold())?;
        } else {
            write!(output, "{name}> ")?;
        }
        output.flush()
    }

    async fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> io::Result<Flow> {
        debug!("Executing {:?} in {}", command, self.tree.path_of(self.tree.current()));

        let result = match command {
            Command::Empty => Ok(None),
            Command::MakeDirectory(name) => self
                .tree
                .create_directory(&name)
                .map(|_| Some(format!("Directory {name} created."))),
            Command::Touch(name) => self
                .tree
                .create_file(&name)
                .map(|_| Some(format!("File {name} created."))),
            Command::Remove(name) => self
                .tree
                .delete_file(&name)
                .map(|_| Some(format!("File {name} deleted."))),
            Command::List => Ok(Some(self.render_listing(&self.tree.list_contents()))),
            Command::ChangeDirectory(name) => self.tree.change_directory(&name).map(|_| None),
            Command::Back => self.tree.change_to_root().map(|_| None),
            Command::Write { name, data } => self
                .tree
                .write_file(&name, &data)
                .map(|_| Some(format!("Content written to {name}."))),
            Command::Read(name) => self.tree.read_file(&name).map(|content| {
                Some(if content.is_empty() {
                    "File is empty.".to_string()
                } else {
                    format!("Content of {name}: {content}")
                })
            }),
            Command::Chmod { name, bits } => self
                .tree
                .set_file_permissions(&name, &bits)
                .map(|permissions| Some(format!("Permissions set to {permissions} for file {name}."))),
            Command::PrintWorkingDirectory => Ok(Some(self.tree.path_of(self.tree.current()))),
            Command::Save => {
                self.save(output).await?;
                return Ok(Flow::Continue);
            }
            Command::Exit => {
                self.finish(output).await?;
                return Ok(Flow::Exit);
            }
            Command::Unknown(verb) => {
                debug!("Unknown verb '{}'", verb);
                Ok(Some("Unknown command.".to_string()))
            }
        };

        match result {
            Ok(Some(message)) => writeln!(output, "{message}")?,
            Ok(None) => {}
            Err(err) => self.report(output, &err)?,
        }
        Ok(Flow::Continue)
    }

    fn render_listing(&self, listing: &Listing) -> String {
        let mut rendered = format!(
            "Directory: {}\nFiles:\n",
            self.tree.current_directory().name()
        );
        for (name, permissions) in &listing.files {
            rendered.push_str(&format!("  {name} [Permissions: {permissions}]\n"));
        }
        rendered.push_str("Subdirectories:");
        for name in &listing.subdirectories {
            rendered.push_str(&format!("\n  {name}"));
        }
        rendered
    }

    async fn finish<W: Write>(&self, output: &mut W) -> io::Result<()> {
        if self.save_on_exit {
            self.save(output).await?;
        } else {
            info!("Leaving without saving");
        }
        Ok(())
    }

    async fn save<W: Write>(&self, output: &mut W) -> io::Result<()> {
        match self.store.save(&self.tree).await {
            Ok(()) => {
                info!("Saved snapshot to {}", self.store.path().display());
                writeln!(output, "File system saved.")
            }
            Err(err) => {
                error!("Snapshot save failed: {:?}", err);
                self.report(output, &err)
            }
        }
    }

    fn report<W: Write, E: std::fmt::Display>(&self, output: &mut W, err: &E) -> io::Result<()> {
        if self.color {
            writeln!(output, "{}", err.to_string().red())
        } else {
            writeln!(output, "{err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{LoadOutcome, SnapshotStore};
    use std::io::Cursor;
    use tempfile::TempDir;

    async fn run_script(session: &mut Session, script: &str) -> String {
        let mut output = Vec::new();
        session
            .run(Cursor::new(script.as_bytes()), &mut output)
            .await
            .expect("in-memory console never fails");
        String::from_utf8(output).expect("utf8 output")
    }

    fn session_in(temp_dir: &TempDir, save_on_exit: bool) -> Session {
        let store = SnapshotStore::new(temp_dir.path().join("filesystem_data.txt"));
        Session::new(FilesystemTree::new(), store, save_on_exit)
    }

    #[compio::test]
    async fn walkthrough_matches_console_transcript() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut session = session_in(&temp_dir, true);

        let output = run_script(
            &mut session,
            "mkdir projects\n\
             cd projects\n\
             touch file1.txt\n\
             write file1.txt Hello\n\
             read file1.txt\n\
             ls\n\
             back\n\
             ls\n\
             chmod projects/file1.txt 110\n\
             cd projects\n\
             chmod file1.txt 100\n\
             write file1.txt MoreData\n\
             chmod file1.txt 111\n\
             write file1.txt MoreData\n\
             read file1.txt\n\
             exit\n",
        )
        .await;

        let expected = "File System Simulation\n\
            Commands: mkdir <name>, touch <name>, rm <name>, ls, cd <name>, back, write <file> <data>, read <file>, chmod <file> <perm>, pwd, save, exit\n\
            root> Directory projects created.\n\
            root> projects> File file1.txt created.\n\
            projects> Content written to file1.txt.\n\
            projects> Content of file1.txt: Hello\n\
            projects> Directory: projects\n\
            Files:\n  file1.txt [Permissions: 111]\n\
            Subdirectories:\n\
            projects> root> Directory: root\n\
            Files:\n\
            Subdirectories:\n  projects\n\
            root> File projects/file1.txt not found.\n\
            root> projects> Permissions set to 100 for file file1.txt.\n\
            projects> Write permission denied for file file1.txt.\n\
            projects> Permissions set to 111 for file file1.txt.\n\
            projects> Content written to file1.txt.\n\
            projects> Content of file1.txt: HelloMoreData\n\
            projects> File system saved.\n";
        assert_eq!(output, expected);

        let saved = std::fs::read_to_string(temp_dir.path().join("filesystem_data.txt"))
            .expect("snapshot written on exit");
        assert_eq!(
            saved,
            "DIR root/projects\nFILE root/projects/file1.txt 111 HelloMoreData\n"
        );
    }

    #[compio::test]
    async fn failures_are_reported_and_session_continues() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut session = session_in(&temp_dir, false);

        let output = run_script(
            &mut session,
            "back\ncd nowhere\nrm ghost\ntouch a\ntouch a\nread a\nchmod a 1x1\nfly\n\nexit\n",
        )
        .await;

        for expected in [
            "Already at root directory.",
            "Directory nowhere not found.",
            "File ghost not found.",
            "File a already exists.",
            "File is empty.",
            "Invalid permission format '1x1'",
            "Unknown command.",
        ] {
            assert!(output.contains(expected), "missing {expected:?} in {output}");
        }
        assert!(!temp_dir.path().join("filesystem_data.txt").exists());
        assert_eq!(session.tree().read_file("a"), Ok(""));
    }

    #[compio::test]
    async fn end_of_input_saves_like_exit() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut session = session_in(&temp_dir, true);

        run_script(&mut session, "mkdir a\ncd a\npwd\n").await;

        let store = SnapshotStore::new(temp_dir.path().join("filesystem_data.txt"));
        match store.load().await.expect("load") {
            LoadOutcome::Restored(tree) => {
                assert_eq!(tree.directory(tree.root()).list_contents().subdirectories, ["a"]);
            }
            LoadOutcome::NoPriorSnapshot(_) => panic!("Expected Restored"),
        }
    }

    #[compio::test]
    async fn pwd_prints_persisted_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut session = session_in(&temp_dir, false);

        let output = run_script(&mut session, "mkdir a\ncd a\nmkdir b\ncd b\npwd\nexit\n").await;

        assert!(output.contains("b> root/a/b\n"));
    }

    #[compio::test]
    async fn failed_save_keeps_session_alive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SnapshotStore::new(temp_dir.path().join("missing/dir/fs.txt"));
        let mut session = Session::new(FilesystemTree::new(), store, false);

        let output = run_script(&mut session, "touch a\nsave\nwrite a still here\nread a\nexit\n").await;

        assert!(output.contains("Failed to save the file system"));
        assert!(output.contains("Content of a: still here"));
    }
}
