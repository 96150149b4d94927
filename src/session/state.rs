//! Session state: the selected table and the description captured by `use`.

use std::fmt;

use crate::store::{KeySchema, TableDescription};

/// Message shared by every table-scoped command when nothing is selected.
pub const NO_TABLE_SELECTED: &str = "No table selected, please select one first (use command).";

/// Raised by [`Session::require_table`] when no table is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoTableSelected;

impl fmt::Display for NoTableSelected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NO_TABLE_SELECTED)
    }
}

impl std::error::Error for NoTableSelected {}

/// A table chosen with the `use` command.
///
/// Holds the description returned when the table was selected. Later
/// changes on the service side are not reflected until the next `use`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTable {
    description: TableDescription,
}

impl SelectedTable {
    /// Table name as reported by the service.
    pub fn name(&self) -> &str {
        &self.description.name
    }

    /// Key schema captured when the table was selected.
    pub fn key_schema(&self) -> &KeySchema {
        &self.description.key_schema
    }

    /// Full description captured when the table was selected.
    pub fn description(&self) -> &TableDescription {
        &self.description
    }
}

/// Interactive session state.
///
/// Name, schema and description are held in one value, so they are always
/// replaced or cleared together.
#[derive(Debug, Clone, Default)]
pub struct Session {
    selected: Option<SelectedTable>,
}

impl Session {
    /// Create a session with no table selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the selected table, or `""` if none.
    pub fn table_name(&self) -> &str {
        self.selected.as_ref().map_or("", |t| t.name())
    }

    /// Key schema of the selected table.
    pub fn key_schema(&self) -> Option<&KeySchema> {
        self.selected.as_ref().map(|t| t.key_schema())
    }

    /// The selected table, if any.
    pub fn selected(&self) -> Option<&SelectedTable> {
        self.selected.as_ref()
    }

    /// Precondition for table-scoped commands.
    pub fn require_table(&self) -> Result<&SelectedTable, NoTableSelected> {
        self.selected.as_ref().ok_or(NoTableSelected)
    }

    /// Replace the selection with the table `description` describes.
    pub fn select(&mut self, description: TableDescription) {
        self.selected = Some(SelectedTable { description });
    }

    /// Forget the selected table.
    ///
    /// Returns the previous selection.
    pub fn clear(&mut self) -> Option<SelectedTable> {
        self.selected.take()
    }

    /// Prompt shown before each input line.
    pub fn prompt(&self) -> String {
        format!("[{}] > ", self.table_name())
    }
}
