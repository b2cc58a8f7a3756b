//! Interactive prompts for directories and the "merge another set" question.

use crate::RunnerError;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Which directory is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Directory holding the tiles to merge.
    Input,
    /// Directory the merged tile is written to.
    Output,
}

impl DirectoryKind {
    fn question(&self) -> &'static str {
        match self {
            DirectoryKind::Input => "Enter the directory holding the DTM tiles to merge:",
            DirectoryKind::Output => "Enter the directory to save the merged DTM in:",
        }
    }
}

/// Remove one pair of surrounding quotes, as left by drag-and-drop or copy
/// from a file manager.
pub fn strip_quotes(raw: &str) -> &str {
    let s = raw.trim();
    let s = s.strip_prefix(['"', '\'']).unwrap_or(s);
    s.strip_suffix(['"', '\'']).unwrap_or(s)
}

/// Prompts on a writer and reads answers from a reader.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String, RunnerError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RunnerError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until the answer names an existing directory.
    pub fn ask_directory(&mut self, kind: DirectoryKind) -> Result<PathBuf, RunnerError> {
        loop {
            writeln!(self.output, "{}", kind.question())?;
            self.output.flush()?;

            let answer = self.read_answer()?;
            let path = PathBuf::from(strip_quotes(&answer));
            if !path.as_os_str().is_empty() && path.is_dir() {
                writeln!(self.output)?;
                return Ok(path);
            }
            writeln!(self.output, "That directory does not exist. Try again!\n")?;
        }
    }

    /// Ask whether to merge another set; `true` means yes.
    pub fn ask_repeat(&mut self) -> Result<bool, RunnerError> {
        loop {
            writeln!(
                self.output,
                "Would you like to merge another set of DTMs [y] or quit [n]?"
            )?;
            self.output.flush()?;

            match self.read_answer()?.trim() {
                "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                _ => writeln!(self.output, "Incorrect answer. Try again...\n")?,
            }
        }
    }
}
