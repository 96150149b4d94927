//! Command-line interface for dynamo-shell.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Path to credentials file.
    pub credentials: Option<PathBuf>,
    /// Service region.
    pub region: Option<String>,
    /// Service endpoint override.
    pub endpoint_url: Option<String>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Disable persistent line history.
    pub no_history: bool,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('C') | Long("credentials") => {
                result.credentials = Some(parser.value()?.parse()?);
            }
            Short('r') | Long("region") => {
                let value: String = parser.value()?.parse()?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidValue("region", value));
                }
                result.region = Some(value);
            }
            Short('e') | Long("endpoint-url") => {
                let value: String = parser.value()?.parse()?;
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(ArgsError::InvalidValue("endpoint-url", value));
                }
                result.endpoint_url = Some(value);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Long("no-history") => {
                result.no_history = true;
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"dynamo-shell {version}
Interactive shell for browsing and managing DynamoDB tables

USAGE:
    dynamo-shell [OPTIONS]

OPTIONS:
    -c, --config <FILE>         Path to configuration file (JSON)
    -C, --credentials <FILE>    Credentials file [default: ~/.aws-credentials]
    -r, --region <REGION>       Service region [default: us-east-1]
    -e, --endpoint-url <URL>    Service endpoint (e.g. local DynamoDB)
    -l, --log-level <LVL>       Log level (error, warn, info, debug, trace)
        --no-history            Do not load or save line history
    -h, --help                  Print help
    -V, --version               Print version

ENVIRONMENT VARIABLES:
    DYNAMO_SHELL_REGION         Service region (overrides config)
    DYNAMO_SHELL_ENDPOINT_URL   Service endpoint (overrides config)
    DYNAMO_SHELL_CREDENTIALS    Credentials file (overrides config)
    DYNAMO_SHELL_HISTORY        History file; empty disables history
    DYNAMO_SHELL_LOG_LEVEL      Log level (overrides config)
    RUST_LOG                    Alternative log level setting

SHELL COMMANDS:
    listTables                  List all tables
    use <tableName>             Select a table
    describe                    Describe the selected table
    scan                        Print every item of the selected table
    getItem <hashKey> [rangeKey]
                                Fetch one item of the selected table
    deleteTable                 Delete the selected table
    help                        List shell commands
    quit                        Leave the shell

EXAMPLES:
    # Use ~/.aws-credentials against us-east-1
    dynamo-shell

    # Local DynamoDB
    dynamo-shell -e http://localhost:8000 -C ./local-credentials
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("dynamo-shell {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
