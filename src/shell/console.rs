//! Console I/O used by the shell.
//!
//! [`EditorConsole`] is the interactive terminal with rustyline line editing
//! and persistent history. [`ScriptedConsole`] replays fixed input lines and
//! captures output, for driving the shell without a terminal.

use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use crate::error::DynamoShellError;
use crate::Result;

/// Line-oriented console.
pub trait Console {
    /// Show `prompt` and read one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Write text without a line break.
    fn print_string(&mut self, text: &str) -> Result<()>;

    /// End the current line.
    fn print_newline(&mut self) -> Result<()>;

    /// Record an executed line in history.
    fn add_history(&mut self, _line: &str) {}

    /// Called once when the shell loop ends.
    fn finish(&mut self) {}
}

/// Terminal console backed by rustyline.
pub struct EditorConsole {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl EditorConsole {
    /// Create a console, loading history from `history` if given.
    pub fn new(history: Option<PathBuf>) -> Result<Self> {
        let mut editor = DefaultEditor::new()
            .map_err(|e| DynamoShellError::Readline(format!("failed to initialize: {}", e)))?;

        if let Some(ref path) = history {
            if editor.load_history(path).is_err() {
                debug!(path = %path.display(), "no history loaded");
            }
        }

        Ok(Self { editor, history })
    }
}

impl Console for EditorConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // Ctrl-C drops the current line.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(DynamoShellError::Readline(err.to_string())),
        }
    }

    fn print_string(&mut self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn print_newline(&mut self) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    fn add_history(&mut self, line: &str) {
        self.editor.add_history_entry(line).ok();
    }

    fn finish(&mut self) {
        if let Some(ref path) = self.history {
            if let Err(e) = self.editor.save_history(path) {
                warn!(path = %path.display(), error = %e, "could not save history");
            }
        }
    }
}

/// Console fed from a fixed list of lines, capturing everything printed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: String,
    prompts: Vec<String>,
    history: Vec<String>,
    finished: bool,
}

impl ScriptedConsole {
    /// Create a console that will return `lines` in order, then end of input.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything printed so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Return and clear the captured output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Prompts shown, one per read.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines recorded in history.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Whether the shell loop has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn print_string(&mut self, text: &str) -> Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn print_newline(&mut self) -> Result<()> {
        self.output.push('\n');
        Ok(())
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
