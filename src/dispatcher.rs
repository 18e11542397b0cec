//! Resolves a request to a command and runs it.

use std::io::Write;

use tracing::debug;

use crate::commands::{args, Command, CommandKind, CommandRegistry};
use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::exec::{run_alias, run_script, Launcher};

/// Usage text printed when no command is given.
pub const USAGE: &str = "Usage:\n\
    \tescripts [--list] <command> [--<arg> <value> ...] [--help]\n\
    Use --list to see available commands.";

/// Message printed for names that resolve to nothing.
pub const UNKNOWN_COMMAND: &str = "Unknown command. Use `--list` to see available commands.";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Print usage text.
    Usage,
    /// List every script and alias.
    List,
    /// Run a named command with its raw tokens.
    Run { name: String, args: Vec<String> },
}

/// Runs requests against a command registry.
pub struct Dispatcher<'a, L> {
    registry: &'a CommandRegistry,
    settings: &'a Settings,
    launcher: L,
}

impl<'a, L: Launcher> Dispatcher<'a, L> {
    pub fn new(registry: &'a CommandRegistry, settings: &'a Settings, launcher: L) -> Self {
        Self {
            registry,
            settings,
            launcher,
        }
    }

    /// Handle a request, writing user-facing output to `out`.
    ///
    /// An unknown command name is not an error.
    pub fn dispatch(&self, request: &Request, out: &mut dyn Write) -> Result<()> {
        match request {
            Request::Usage => writeln!(out, "{}", USAGE)?,
            Request::List => self.registry.write_list(out)?,
            Request::Run { name, args } => match self.registry.get(name) {
                Some(command) => self.run_command(command, args, out)?,
                None => {
                    debug!(command = %name, "Unknown command");
                    writeln!(out, "{}", UNKNOWN_COMMAND)?;
                }
            },
        }
        Ok(())
    }

    fn run_command(&self, command: &Command, tokens: &[String], out: &mut dyn Write) -> Result<()> {
        let name = command.name.as_str();
        if args::wants_help(tokens) {
            command.write_help(out)?;
            return Ok(());
        }

        let bindings = command
            .options
            .bind(tokens)
            .map_err(|e| AppError::command(name, e))?;
        debug!(command = %name, bound = bindings.len(), "Arguments bound");

        let result = match &command.kind {
            CommandKind::Script { path } => {
                run_script(&self.launcher, self.settings, path.as_deref(), &bindings)
            }
            CommandKind::Alias { command } => {
                run_alias(&self.launcher, self.settings, command.as_deref(), &bindings)
            }
        };
        result.map_err(|e| AppError::command(name, e))
    }
}
