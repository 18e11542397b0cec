//! Script and alias execution.
//!
//! Executors turn a resolved command plus its bindings into an
//! [`Invocation`] and hand it to a [`Launcher`]. All path checks happen
//! before anything is spawned.

mod alias;
mod launcher;
mod script;

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::error;

use crate::commands::TemplateError;

pub use alias::run_alias;
pub use launcher::{inherited_env, Invocation, Launcher, SystemLauncher};
pub use script::run_script;

#[cfg(test)]
pub use launcher::RecordingLauncher;

/// Errors that can occur while executing a command.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The script definition has no `path`.
    #[error("Script path is not specified in the configuration")]
    MissingPath,

    /// The alias definition has no `command`.
    #[error("Command is not specified for the alias")]
    MissingCommand,

    /// A template placeholder has no bound value.
    #[error("Missing argument for command template: '{0}'")]
    MissingArgument(String),

    /// The command template is malformed.
    #[error("{0}")]
    Template(TemplateError),

    /// The script file does not exist.
    #[error("File '{0}' does not exist")]
    NotFound(PathBuf),

    /// The script path is not a regular file.
    #[error("'{0}' is not a file")]
    InvalidPath(PathBuf),

    /// The child process could not be started.
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The child process exited unsuccessfully.
    #[error("'{program}' {}", describe_exit(.code))]
    Execution { program: String, code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

impl From<TemplateError> for ExecError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::MissingArgument(name) => ExecError::MissingArgument(name),
            other => ExecError::Template(other),
        }
    }
}

/// Result type for execution operations.
pub type Result<T> = std::result::Result<T, ExecError>;

/// Launch the invocation and turn a failed exit into an error.
///
/// Failures are logged here, before being returned to the caller.
fn launch_checked<L: Launcher>(launcher: &L, invocation: &Invocation) -> Result<()> {
    let program = invocation.program_name();
    let exit = launcher
        .launch(invocation)
        .map_err(|source| ExecError::Spawn {
            program: program.clone(),
            source,
        })?;

    if exit.success() {
        Ok(())
    } else {
        let err = ExecError::Execution {
            program,
            code: exit.code,
        };
        error!("{}", err);
        Err(err)
    }
}
