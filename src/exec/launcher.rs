//! Child process launching.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// A fully described child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run.
    pub program: OsString,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
    /// Working directory, or the current one when `None`.
    pub cwd: Option<PathBuf>,
    /// Complete child environment, or the inherited one when `None`.
    pub env: Option<BTreeMap<OsString, OsString>>,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
            env: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env_map(mut self, env: BTreeMap<OsString, OsString>) -> Self {
        self.env = Some(env);
        self
    }

    /// Program name for log and error messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl ChildExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an [`Invocation`] to completion.
pub trait Launcher {
    /// Spawn the child and block until it exits.
    fn launch(&self, invocation: &Invocation) -> io::Result<ChildExit>;
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(&self, invocation: &Invocation) -> io::Result<ChildExit> {
        (**self).launch(invocation)
    }
}

/// Launches real processes with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<ChildExit> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }
        if let Some(env) = &invocation.env {
            command.env_clear().envs(env);
        }

        let status = command.status()?;
        Ok(ChildExit {
            code: status.code(),
        })
    }
}

/// Build a child environment from the current process environment with
/// `overrides` applied on top.
pub fn inherited_env<I, K, V>(overrides: I) -> BTreeMap<OsString, OsString>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let mut env: BTreeMap<OsString, OsString> = std::env::vars_os().collect();
    env.extend(
        overrides
            .into_iter()
            .map(|(key, value)| (key.into(), value.into())),
    );
    env
}

/// Records invocations instead of running them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    pub exit_code: Option<i32>,
    pub calls: std::cell::RefCell<Vec<Invocation>>,
}

#[cfg(test)]
impl RecordingLauncher {
    pub fn succeeding() -> Self {
        Self {
            exit_code: Some(0),
            ..Self::default()
        }
    }

    pub fn exiting_with(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

#[cfg(test)]
impl Launcher for RecordingLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<ChildExit> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(ChildExit {
            code: self.exit_code,
        })
    }
}
