//! Error types for dynamo-shell.

use thiserror::Error;

use crate::session::NoTableSelected;
use crate::store::ServiceError;

/// Main error type for dynamo-shell startup and internal operations.
#[derive(Error, Debug)]
pub enum DynamoShellError {
    /// Command-line arguments could not be parsed.
    #[error("invalid arguments: {0}")]
    Args(#[from] crate::cli::ArgsError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Credentials file could not be read or is incomplete.
    #[error("credentials error: {0}")]
    Credentials(String),

    /// Two commands were registered under the same name.
    #[error("duplicate command registration: {0}")]
    DuplicateCommand(String),

    /// Line editor failure.
    #[error("line editor error: {0}")]
    Readline(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for dynamo-shell operations.
pub type Result<T> = std::result::Result<T, DynamoShellError>;

/// Failure of a single shell command.
///
/// Every variant is recoverable: the shell prints it and keeps reading.
#[derive(Error, Debug)]
pub enum CommandError {
    /// A table-scoped command ran with nothing selected.
    #[error(transparent)]
    NoTableSelected(#[from] NoTableSelected),

    /// User-facing message, printed verbatim.
    #[error("{0}")]
    Message(String),

    /// The table service rejected the request.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Anything else; printed with diagnostic detail.
    #[error(transparent)]
    Internal(#[from] DynamoShellError),
}

impl CommandError {
    /// Create a user-facing message error.
    pub fn message(msg: impl Into<String>) -> Self {
        CommandError::Message(msg.into())
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::Internal(DynamoShellError::Io(err))
    }
}
