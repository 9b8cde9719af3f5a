//! Folder-creation confirmation.
//!
//! The relocator never decides on its own whether a missing destination directory
//! may be created; it asks a [`FolderConfirmer`]. The CLI uses [`ConsolePrompt`];
//! `--yes` and `--no-create` swap in the fixed policies.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::shutdown;

/// Answers "may I create this directory?" with a definitive yes or no.
pub trait FolderConfirmer {
    fn confirm_create_folder(&mut self, path: &Path) -> bool;
}

/// Always allow creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysCreate;

impl FolderConfirmer for AlwaysCreate {
    fn confirm_create_folder(&mut self, _path: &Path) -> bool {
        true
    }
}

/// Never allow creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCreate;

impl FolderConfirmer for NeverCreate {
    fn confirm_create_folder(&mut self, _path: &Path) -> bool {
        false
    }
}

/// Interactive yes/no prompt over any reader/writer pair.
///
/// Unrecognised answers re-ask; end of input counts as "no". A read cannot be
/// cancelled, so an interrupt takes effect once the pending answer arrives and
/// then counts as "no".
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
    stop_requested: fn() -> bool,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            stop_requested: shutdown::is_requested,
        }
    }

    /// Replace the shutdown check consulted after each answer.
    pub fn with_stop_check(mut self, stop_requested: fn() -> bool) -> Self {
        self.stop_requested = stop_requested;
        self
    }
}

impl<R: BufRead, W: Write> FolderConfirmer for ConsolePrompt<R, W> {
    fn confirm_create_folder(&mut self, path: &Path) -> bool {
        loop {
            let _ = write!(
                self.output,
                "Folder '{}' does not exist. Create it? [y/n] ",
                path.display()
            );
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }
            if (self.stop_requested)() {
                return false;
            }
            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => {
                    let _ = writeln!(self.output, "Please answer 'y' or 'n'.");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answers: &str) -> (bool, String) {
        let mut out = Vec::new();
        let got = ConsolePrompt::new(answers.as_bytes(), &mut out).confirm_create_folder(Path::new("/out/a"));
        (got, String::from_utf8(out).unwrap())
    }

    #[test]
    fn yes_and_no() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(!ask("n\n").0);
    }

    #[test]
    fn reasks_until_definitive() {
        let (got, transcript) = ask("maybe\n\ny\n");
        assert!(got);
        assert_eq!(transcript.matches("Create it?").count(), 3);
        assert!(transcript.contains("/out/a"));
    }

    #[test]
    fn interrupt_during_prompt_declines() {
        let mut out = Vec::new();
        let got = ConsolePrompt::new("y\n".as_bytes(), &mut out)
            .with_stop_check(|| true)
            .confirm_create_folder(Path::new("/out/a"));
        assert!(!got);
    }

    #[test]
    fn end_of_input_declines() {
        assert!(!ask("").0);
    }

    #[test]
    fn fixed_policies() {
        assert!(AlwaysCreate.confirm_create_folder(Path::new("x")));
        assert!(!NeverCreate.confirm_create_folder(Path::new("x")));
    }
}
