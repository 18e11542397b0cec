//! Runtime settings resolved from the command line and the environment.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use super::{default_workspace, Result};

/// Environment variable selecting the script interpreter.
pub const INTERPRETER_ENV: &str = "ESCRIPTS_PYTHON";

/// Environment variable the workspace path is injected into for scripts.
pub const MODULE_PATH_ENV: &str = "PYTHONPATH";

#[cfg(windows)]
const DEFAULT_INTERPRETER: &str = "python";
#[cfg(not(windows))]
const DEFAULT_INTERPRETER: &str = "python3";

/// Settings shared by every command of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Absolute path of the workspace directory.
    pub workspace: PathBuf,
    /// Interpreter used to run script definitions.
    pub interpreter: String,
    /// Environment variable receiving the workspace path for scripts.
    pub module_path_var: String,
}

impl Settings {
    /// Create settings for the given workspace with the default interpreter.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            module_path_var: MODULE_PATH_ENV.to_string(),
        }
    }

    /// Resolve settings from an optional workspace override and the
    /// process environment.
    pub fn resolve(workspace: Option<&Path>) -> Result<Self> {
        let workspace = match workspace {
            Some(path) => path.to_path_buf(),
            None => default_workspace()?,
        };
        let workspace = absolutize(&workspace).unwrap_or(workspace);

        Ok(Self::new(workspace).with_interpreter(get_interpreter()))
    }

    /// Use a specific interpreter.
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }
}

/// Detect the script interpreter.
///
/// Uses `$ESCRIPTS_PYTHON` when set and non-empty, otherwise `python3`
/// (`python` on Windows).
pub fn get_interpreter() -> String {
    env::var(INTERPRETER_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string())
}

fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_interpreter_env<F: FnOnce()>(value: Option<&str>, f: F) {
        let original = env::var(INTERPRETER_ENV).ok();
        match value {
            Some(v) => env::set_var(INTERPRETER_ENV, v),
            None => env::remove_var(INTERPRETER_ENV),
        }

        f();

        match original {
            Some(val) => env::set_var(INTERPRETER_ENV, val),
            None => env::remove_var(INTERPRETER_ENV),
        }
    }

    #[test]
    #[serial]
    fn test_interpreter_from_env() {
        with_interpreter_env(Some("/opt/py/bin/python3.12"), || {
            assert_eq!(get_interpreter(), "/opt/py/bin/python3.12");
        });
    }

    #[test]
    #[serial]
    fn test_interpreter_fallback() {
        with_interpreter_env(None, || {
            assert_eq!(get_interpreter(), DEFAULT_INTERPRETER);
        });
    }

    #[test]
    #[serial]
    fn test_empty_interpreter_env_is_ignored() {
        with_interpreter_env(Some(""), || {
            assert_eq!(get_interpreter(), DEFAULT_INTERPRETER);
        });
    }

    #[test]
    #[serial]
    fn test_resolve_with_override() {
        with_interpreter_env(Some("pypy3"), || {
            let settings = Settings::resolve(Some(Path::new("/srv/tools"))).unwrap();
            assert_eq!(settings.workspace, PathBuf::from("/srv/tools"));
            assert_eq!(settings.interpreter, "pypy3");
            assert_eq!(settings.module_path_var, MODULE_PATH_ENV);
        });
    }

    #[test]
    #[serial]
    fn test_resolve_relative_workspace_is_absolute() {
        let settings = Settings::resolve(Some(Path::new("relative/ws"))).unwrap();
        assert!(settings.workspace.is_absolute());
        assert!(settings.workspace.ends_with("relative/ws"));
    }

    #[test]
    fn test_with_interpreter() {
        let settings = Settings::new("/ws").with_interpreter("sh");
        assert_eq!(settings.interpreter, "sh");
    }
}
