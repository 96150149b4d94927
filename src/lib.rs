//! # dynamo-shell
//!
//! Interactive shell for browsing and managing DynamoDB tables.
//!
//! The shell keeps a single piece of state, the selected table and its key
//! schema, and maps each typed command onto one request to the table
//! service:
//!
//! - **Shell**: read-eval-print loop, command registry, prompt
//! - **Session**: selected table and cached key schema
//! - **Store**: request/response adapter over the table service
//!
//! ## Quick Start
//!
//! ```no_run
//! use dynamo_shell::{Credentials, DynamoStore, EditorConsole, ServiceSettings, Shell};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> dynamo_shell::Result<()> {
//!     dynamo_shell::logging::try_init("info").ok();
//!
//!     let credentials = Credentials::parse("accessKey=AKID\nsecretKey=SECRET")?;
//!     let store = DynamoStore::connect(&credentials, &ServiceSettings::default()).await;
//!
//!     let mut shell = Shell::new(store, EditorConsole::new(None)?)?;
//!     shell.run().await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod session;
pub mod shell;
pub mod store;

// Re-export commonly used types
pub use credentials::Credentials;
pub use error::{CommandError, DynamoShellError, Result};
pub use session::{NoTableSelected, SelectedTable, Session};
pub use shell::{
    CommandRegistry, CommandSpec, Console, EditorConsole, LoopOutcome, ScriptedConsole, Shell,
};
pub use store::{
    AttributeValue, DynamoStore, Item, KeySchema, MemoryStore, ServiceError, ServiceSettings,
    TableDescription, TableStore,
};
