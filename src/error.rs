//! Centralized error types for escripts.
//!
//! Every layer owns its own `thiserror` enum; this module aggregates them
//! and maps each failure to a process exit code and an optional hint.

use thiserror::Error;

use crate::commands::ArgumentError;
use crate::config::ConfigError;
use crate::exec::ExecError;

/// Exit code for configuration and definition failures.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for command-line argument failures.
pub const EXIT_USAGE: i32 = 2;

/// Failures while running a single resolved command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The supplied arguments do not match the command's schema.
    #[error(transparent)]
    Arguments(#[from] ArgumentError),

    /// The command could not be executed or failed.
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A resolved command failed.
    #[error("Failed to run command '{name}': {source}")]
    Command {
        name: String,
        #[source]
        source: CommandError,
    },

    /// IO errors (writing output, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Wrap a command failure with the command's name.
    pub fn command(name: impl Into<String>, source: impl Into<CommandError>) -> Self {
        AppError::Command {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Exit code the process should terminate with.
    ///
    /// A failed child propagates its own exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Command { source, .. } => match source {
                CommandError::Arguments(_) => EXIT_USAGE,
                CommandError::Exec(ExecError::Execution { code, .. }) => match code {
                    Some(code) if *code != 0 => *code,
                    _ => EXIT_FAILURE,
                },
                CommandError::Exec(_) => EXIT_FAILURE,
            },
            AppError::Config(_) | AppError::Io(_) => EXIT_FAILURE,
        }
    }

    /// Whether the error was already logged where it happened.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            AppError::Command {
                source: CommandError::Exec(ExecError::Execution { .. }),
                ..
            }
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::NotFound(_)) | AppError::Config(ConfigError::EmptyConfig) => {
                Some("Create config.yml in the workspace (default: ~/.escripts) or pass --workspace.")
            }
            AppError::Config(ConfigError::ParseError(_)) => {
                Some("Check the YAML syntax and the layout of the scripts/aliases sections.")
            }
            AppError::Command {
                source: CommandError::Arguments(_),
                ..
            } => Some("Run the command with --help to see its arguments."),
            AppError::Command {
                source: CommandError::Exec(ExecError::MissingPath | ExecError::NotFound(_)),
                ..
            } => Some("Check the script's `path` in config.yml; it is relative to the workspace."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
