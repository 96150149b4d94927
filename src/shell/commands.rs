//! Built-in command handlers.

use tracing::info;

use super::console::Console;
use super::registry::CommandKind;
use super::{LoopOutcome, Shell};
use crate::error::CommandError;
use crate::store::{Item, KeyError, TableStore};

type CommandResult = std::result::Result<(), CommandError>;

/// Render an item as `name: value, ` pairs on one line.
pub(crate) fn format_item(item: &Item) -> String {
    item.iter()
        .map(|(name, value)| format!("{}: {}, ", name, value))
        .collect()
}

fn key_message(table: &str, err: KeyError) -> CommandError {
    CommandError::message(match err {
        KeyError::MissingRange(attribute) => {
            format!("Table {} requires a range key value ({}).", table, attribute)
        }
        KeyError::UnexpectedRange => format!("Table {} has no range key.", table),
        KeyError::InvalidValue {
            attribute,
            attr_type,
            value,
        } => format!(
            "Invalid value '{}' for key attribute {} ({}).",
            value, attribute, attr_type
        ),
    })
}

fn required<'a>(args: &[&'a str], index: usize) -> std::result::Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::message(format!("Missing argument {}.", index + 1)))
}

impl<S: TableStore, C: Console> Shell<S, C> {
    pub(super) async fn dispatch(
        &mut self,
        kind: CommandKind,
        args: &[&str],
    ) -> std::result::Result<LoopOutcome, CommandError> {
        match kind {
            CommandKind::ListTables => self.list_tables().await?,
            CommandKind::Describe => self.describe()?,
            CommandKind::Use => self.use_table(required(args, 0)?).await?,
            CommandKind::Scan => self.scan().await?,
            CommandKind::DeleteTable => self.delete_table().await?,
            CommandKind::GetItem => {
                self.get_item(required(args, 0)?, args.get(1).copied()).await?
            }
            CommandKind::Help => self.help()?,
            CommandKind::Quit => return Ok(LoopOutcome::Terminate(Some("Goodbye.".to_string()))),
        }
        Ok(LoopOutcome::Continue)
    }

    fn line(&mut self, text: &str) -> CommandResult {
        self.console.print_string(text)?;
        self.console.print_newline()?;
        Ok(())
    }

    async fn list_tables(&mut self) -> CommandResult {
        let names = self.store.list_tables().await?;

        if names.is_empty() {
            self.line("No tables found.")?;
        } else {
            for name in &names {
                self.line(name)?;
            }
        }
        self.console.print_newline()?;
        Ok(())
    }

    fn describe(&mut self) -> CommandResult {
        let text = self.session.require_table()?.description().to_string();
        self.line(&text)
    }

    async fn use_table(&mut self, name: &str) -> CommandResult {
        let description = self.store.describe_table(name).await?;
        let message = format!("Using table {}.", description.name);
        info!(table = %description.name, "table selected");
        self.session.select(description);
        self.line(&message)
    }

    async fn scan(&mut self) -> CommandResult {
        let table = self.session.require_table()?.name().to_string();
        let items = self.store.scan_table(&table).await?;

        for item in &items {
            self.line(&format_item(item))?;
        }
        self.console.print_newline()?;
        Ok(())
    }

    async fn delete_table(&mut self) -> CommandResult {
        let table = self.session.require_table()?.name().to_string();
        let deleted = self.store.delete_table(&table).await?;

        self.session.clear();
        info!(table = %deleted.table_name, "table deleted");
        self.line(&format!(
            "Table {} was successfully deleted.",
            deleted.table_name
        ))
    }

    async fn get_item(&mut self, hash: &str, range: Option<&str>) -> CommandResult {
        let selected = self.session.require_table()?;
        let table = selected.name().to_string();
        let key = selected
            .key_schema()
            .primary_key(hash, range)
            .map_err(|e| key_message(&table, e))?;

        match self.store.get_item(&table, &key).await? {
            Some(item) => self.line(&format_item(&item)),
            None => self.line("No item found."),
        }
    }

    fn help(&mut self) -> CommandResult {
        let lines: Vec<String> = self
            .registry
            .iter()
            .map(|spec| format!("  {:<30} {}", spec.usage(), spec.summary))
            .collect();

        self.line("Commands:")?;
        for line in &lines {
            self.line(line)?;
        }
        self.console.print_newline()?;
        Ok(())
    }
}
