//! Session management module.
//!
//! The session is the shell's only mutable state: which table is selected
//! and the key schema it had when it was selected.

mod state;

pub use state::{NoTableSelected, SelectedTable, Session};
