//! Interactive command shell.
//!
//! The shell reads a line, splits it into a command name and arguments,
//! dispatches to the registered handler and prints the result or the error.
//! The prompt, `[<table>] > `, is rebuilt from the session before every read.
//!
//! ```text
//! read line ─► parse ─► lookup ─► arity check ─► handler ─► LoopOutcome
//!    ▲                    │            │             │          │
//!    │               unknown cmd    usage msg     error msg     │
//!    └────────────────────┴────────────┴─────────────┴──Continue┘
//! ```
//!
//! No command failure ends the loop; only `quit` and end of input do.

mod commands;
mod console;
mod parser;
mod registry;

pub use console::{Console, EditorConsole, ScriptedConsole};
pub use parser::{parse_line, ParsedLine};
pub use registry::{CommandKind, CommandRegistry, CommandSpec, Param, BUILTIN_COMMANDS};

use tracing::{debug, error, info, warn};

use crate::error::CommandError;
use crate::session::Session;
use crate::store::TableStore;
use crate::Result;

/// Result of executing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// Read the next line.
    Continue,
    /// Leave the loop, printing the message if any.
    Terminate(Option<String>),
}

/// Read-eval-print loop over a table store.
pub struct Shell<S, C> {
    store: S,
    console: C,
    session: Session,
    registry: CommandRegistry,
}

impl<S: TableStore, C: Console> Shell<S, C> {
    /// Create a shell with the built-in commands.
    pub fn new(store: S, console: C) -> Result<Self> {
        Ok(Self::with_registry(store, console, CommandRegistry::builtin()?))
    }

    /// Create a shell with a custom command registry.
    pub fn with_registry(store: S, console: C, registry: CommandRegistry) -> Self {
        Self {
            store,
            console,
            session: Session::new(),
            registry,
        }
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The console.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Mutable access to the console.
    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Registered commands.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Prompt for the current session.
    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    /// Run until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        info!("shell started");

        loop {
            let prompt = self.prompt();
            let line = match self.console.read_line(&prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("end of input");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "input failed, closing shell");
                    break;
                }
            };

            if let LoopOutcome::Terminate(message) = self.execute_line(&line).await {
                if let Some(message) = message {
                    self.emit_line(&message);
                }
                break;
            }
        }

        self.console.finish();
        info!("shell stopped");
        Ok(())
    }

    /// Parse, dispatch and report one input line.
    pub async fn execute_line(&mut self, line: &str) -> LoopOutcome {
        let Some(parsed) = parse_line(line) else {
            return LoopOutcome::Continue;
        };
        self.console.add_history(line.trim());

        let Some(spec) = self.registry.lookup(parsed.name).cloned() else {
            debug!(command = parsed.name, "unknown command");
            self.emit_line(&format!(
                "Unknown command: {}. Type help for available commands.",
                parsed.name
            ));
            return LoopOutcome::Continue;
        };

        if !spec.accepts(parsed.args.len()) {
            self.emit_line(&format!("Usage: {}", spec.usage()));
            return LoopOutcome::Continue;
        }

        match self.dispatch(spec.kind, &parsed.args).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.report(&spec, err);
                LoopOutcome::Continue
            }
        }
    }

    fn report(&mut self, spec: &CommandSpec, err: CommandError) {
        match err {
            CommandError::Internal(err) => {
                error!(command = spec.name, error = ?err, "command failed unexpectedly");
                self.emit_line(&format!("Unexpected error in {}: {:?}", spec.name, err));
            }
            CommandError::Service(err) => {
                warn!(command = spec.name, error = %err, "service request failed");
                self.emit_line(&err.to_string());
            }
            other => self.emit_line(&other.to_string()),
        }
    }

    fn emit_line(&mut self, text: &str) {
        let written = self
            .console
            .print_string(text)
            .and_then(|_| self.console.print_newline());
        if let Err(err) = written {
            error!(error = %err, "console output failed");
        }
    }
}
