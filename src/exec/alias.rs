//! Running alias definitions through the shell.

use tracing::info;

use super::{launch_checked, ExecError, Invocation, Launcher, Result};
use crate::commands::{template, Bindings};
use crate::config::Settings;

#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");
#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");

/// Run an alias definition.
///
/// The template is rendered with the bindings and executed by the platform
/// shell from the workspace directory.
pub fn run_alias<L: Launcher>(
    launcher: &L,
    settings: &Settings,
    command: Option<&str>,
    bindings: &Bindings,
) -> Result<()> {
    let pattern = command
        .filter(|c| !c.is_empty())
        .ok_or(ExecError::MissingCommand)?;
    let command_line = template::render(pattern, bindings)?;

    let (shell, flag) = SHELL;
    let invocation = Invocation::new(shell)
        .arg(flag)
        .arg(&command_line)
        .current_dir(&settings.workspace);

    info!(command = %command_line, "Running alias");
    launch_checked(launcher, &invocation)
}
