//! Shared CLI types: errors, exit codes and invocation context.

use crate::config::Config;
use clap::Args;
use std::fmt;
use std::path::PathBuf;

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Input was rejected (dependency rule, invalid arguments, failed check)
    Validation = 1,
    /// A file could not be read, written or serialized
    Io = 2,
}

impl ExitCode {
    /// Numeric process status.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Process status to exit with
    pub code: i32,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::status(ExitCode::Validation.code(), message)
    }

    /// I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self::status(ExitCode::Io.code(), message)
    }

    /// Failure carrying a status propagated from an external process.
    pub fn status(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Status the process should exit with.
    pub const fn exit_code(&self) -> i32 {
        self.code
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    config_path: Option<PathBuf>,
}

impl CliContext {
    /// Uses `config_path` instead of the platform config file when given.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    /// Loads the configuration for this invocation.
    pub fn load_config(&self) -> CliResult<Config> {
        let loaded = match &self.config_path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        };
        loaded.map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))
    }

    /// Reads the configuration without validating it.
    pub fn read_config(&self) -> CliResult<Config> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => Config::config_file_path()
                .map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))?,
        };
        Config::read_from(&path)
            .map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))
    }

    /// Saves the configuration back to where it was loaded from.
    pub fn save_config(&self, config: &Config) -> CliResult<()> {
        let saved = match &self.config_path {
            Some(path) => config.save_to(path),
            None => config.save(),
        };
        saved.map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))
    }
}

/// Rule table selection flags.
#[derive(Debug, Clone, Default, Args)]
pub struct RuleArgs {
    /// TOML rule file evaluated after the built-in rules
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Evaluate only the rule file, ignoring the built-in rules
    #[arg(long, requires = "rules")]
    pub replace_builtin: bool,
}

impl RuleArgs {
    /// Overrides the configured rule selection with the command-line flags.
    pub fn apply(&self, config: &mut Config) {
        if let Some(rules) = &self.rules {
            config.paths.rules_file = Some(rules.clone());
        }
        if self.replace_builtin {
            config.build.replace_builtin_rules = true;
        }
    }
}
