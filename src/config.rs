//! Configuration management for dynamo-shell.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::credentials::Credentials;
use crate::store::ServiceSettings;

const DEFAULT_HISTORY_FILE: &str = ".dynamo_shell_history";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Table service connection settings.
    pub service: ServiceSection,
    /// Credentials file settings.
    pub credentials: CredentialsSection,
    /// Line history settings.
    pub history: HistorySection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Service configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Service region.
    pub region: String,
    /// Endpoint override, e.g. a local DynamoDB.
    pub endpoint_url: Option<String>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
        }
    }
}

/// Credentials configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsSection {
    /// Credentials file; `~/.aws-credentials` when unset.
    pub path: Option<PathBuf>,
}

/// History configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    /// Load and save line history.
    pub enabled: bool,
    /// History file; `~/.dynamo_shell_history` when unset.
    pub path: Option<PathBuf>,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(region) = var("DYNAMO_SHELL_REGION") {
            if !region.trim().is_empty() {
                self.service.region = region;
            }
        }

        if let Some(url) = var("DYNAMO_SHELL_ENDPOINT_URL") {
            self.service.endpoint_url = if url.is_empty() { None } else { Some(url) };
        }

        if let Some(path) = var("DYNAMO_SHELL_CREDENTIALS") {
            if !path.is_empty() {
                self.credentials.path = Some(PathBuf::from(path));
            }
        }

        if let Some(path) = var("DYNAMO_SHELL_HISTORY") {
            if path.is_empty() {
                self.history.enabled = false;
            } else {
                self.history.path = Some(PathBuf::from(path));
            }
        }

        if let Some(level) = var("DYNAMO_SHELL_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref region) = args.region {
            self.service.region = region.clone();
        }

        if let Some(ref url) = args.endpoint_url {
            self.service.endpoint_url = Some(url.clone());
        }

        if let Some(ref path) = args.credentials {
            self.credentials.path = Some(path.clone());
        }

        if args.no_history {
            self.history.enabled = false;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Connection settings for the table service.
    pub fn service_settings(&self) -> Result<ServiceSettings, ConfigError> {
        if self.service.region.trim().is_empty() {
            return Err(ConfigError::InvalidRegion(self.service.region.clone()));
        }
        Ok(ServiceSettings {
            region: self.service.region.clone(),
            endpoint_url: self.service.endpoint_url.clone(),
        })
    }

    /// Resolved credentials file path.
    pub fn credentials_path(&self) -> Result<PathBuf, ConfigError> {
        self.credentials
            .path
            .clone()
            .or_else(Credentials::default_path)
            .ok_or(ConfigError::NoHomeDirectory)
    }

    /// Resolved history file path, `None` when history is disabled.
    pub fn history_path(&self) -> Option<PathBuf> {
        if !self.history.enabled {
            return None;
        }
        self.history
            .path
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE)))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Region is empty.
    InvalidRegion(String),
    /// No explicit credentials path and no home directory to default to.
    NoHomeDirectory,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidRegion(region) => write!(f, "invalid region: '{}'", region),
            Self::NoHomeDirectory => {
                write!(f, "no home directory found; pass --credentials to locate the credentials file")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
