//! Command registration.

use std::collections::HashMap;

use crate::error::DynamoShellError;
use crate::Result;

/// Handler a registered command dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    ListTables,
    Describe,
    Use,
    Scan,
    DeleteTable,
    GetItem,
    Help,
    Quit,
}

const USE_PARAMS: &[Param] = &[Param::required("tableName")];
const GET_ITEM_PARAMS: &[Param] = &[Param::required("hashKey"), Param::optional("rangeKey")];

impl CommandKind {
    /// Positional parameters the handler reads.
    pub fn params(self) -> &'static [Param] {
        match self {
            CommandKind::Use => USE_PARAMS,
            CommandKind::GetItem => GET_ITEM_PARAMS,
            CommandKind::ListTables
            | CommandKind::Describe
            | CommandKind::Scan
            | CommandKind::DeleteTable
            | CommandKind::Help
            | CommandKind::Quit => &[],
        }
    }
}

/// A positional parameter of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Name shown in usage messages.
    pub name: &'static str,
    /// Whether the argument must be given.
    pub required: bool,
}

impl Param {
    /// A mandatory parameter.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    /// A parameter that may be omitted. Optional parameters come last.
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// A command name bound to its handler.
///
/// Parameters come from the handler kind, so the arity check always
/// matches what the handler reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Name typed at the prompt.
    pub name: &'static str,
    /// One-line description for `help`.
    pub summary: &'static str,
    /// Handler.
    pub kind: CommandKind,
}

impl CommandSpec {
    /// Positional parameters.
    pub fn params(&self) -> &'static [Param] {
        self.kind.params()
    }

    /// Fewest arguments accepted.
    pub fn min_args(&self) -> usize {
        self.params().iter().filter(|p| p.required).count()
    }

    /// Most arguments accepted.
    pub fn max_args(&self) -> usize {
        self.params().len()
    }

    /// Check an argument count against the declared arity.
    pub fn accepts(&self, count: usize) -> bool {
        (self.min_args()..=self.max_args()).contains(&count)
    }

    /// Usage line, e.g. `getItem <hashKey> [rangeKey]`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.to_string();
        for param in self.params() {
            if param.required {
                usage.push_str(&format!(" <{}>", param.name));
            } else {
                usage.push_str(&format!(" [{}]", param.name));
            }
        }
        usage
    }
}

/// Commands every shell starts with.
pub const BUILTIN_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "listTables",
        summary: "List all tables",
        kind: CommandKind::ListTables,
    },
    CommandSpec {
        name: "use",
        summary: "Select a table",
        kind: CommandKind::Use,
    },
    CommandSpec {
        name: "describe",
        summary: "Describe the selected table",
        kind: CommandKind::Describe,
    },
    CommandSpec {
        name: "scan",
        summary: "Print every item of the selected table",
        kind: CommandKind::Scan,
    },
    CommandSpec {
        name: "getItem",
        summary: "Fetch one item of the selected table by primary key",
        kind: CommandKind::GetItem,
    },
    CommandSpec {
        name: "deleteTable",
        summary: "Delete the selected table",
        kind: CommandKind::DeleteTable,
    },
    CommandSpec {
        name: "help",
        summary: "List available commands",
        kind: CommandKind::Help,
    },
    CommandSpec {
        name: "quit",
        summary: "Leave the shell",
        kind: CommandKind::Quit,
    },
];

/// Name to handler mapping. Names match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding [`BUILTIN_COMMANDS`].
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for spec in BUILTIN_COMMANDS {
            registry.register(spec.clone())?;
        }
        Ok(registry)
    }

    /// Register a command.
    ///
    /// Fails if a command with the same name (ignoring case) exists.
    pub fn register(&mut self, spec: CommandSpec) -> Result<()> {
        let key = spec.name.to_ascii_lowercase();
        if self.index.contains_key(&key) {
            return Err(DynamoShellError::DuplicateCommand(spec.name.to_string()));
        }
        self.index.insert(key, self.commands.len());
        self.commands.push(spec);
        Ok(())
    }

    /// Find a command by name.
    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.commands[i])
    }

    /// Registered commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
