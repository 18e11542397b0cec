//! Configuration management for escripts.
//!
//! This module locates the workspace directory, loads `config.yml` from it
//! and exposes the runtime settings that drive command execution.

mod definition;
mod settings;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use definition::{Config, ParamKind, ParamSpec};
pub use settings::Settings;

/// Name of the configuration file inside the workspace.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Name of the default workspace directory under the user's home.
pub const DEFAULT_WORKSPACE_DIR: &str = ".escripts";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The home directory could not be determined.
    #[error("Could not determine the home directory")]
    NoHomeDir,

    /// The workspace directory or the configuration file does not exist.
    #[error("'{0}' does not exist")]
    NotFound(PathBuf),

    /// The path exists but has the wrong kind (file vs. directory).
    #[error("'{path}' is not a {expected}")]
    InvalidPath { path: PathBuf, expected: &'static str },

    /// The configuration file could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration document is not valid YAML or has the wrong shape.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// The configuration document is empty.
    #[error("Configuration is empty")]
    EmptyConfig,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Get the default workspace directory (`~/.escripts`).
pub fn default_workspace() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_WORKSPACE_DIR))
        .ok_or(ConfigError::NoHomeDir)
}

/// Load `config.yml` from the given workspace directory.
///
/// # Errors
///
/// - `NotFound` if the workspace or the config file is missing
/// - `InvalidPath` if the workspace is not a directory or the config is not a file
/// - `ParseError` if the document is not a valid configuration
/// - `EmptyConfig` if the document contains nothing
pub fn load_config(workspace: &Path) -> Result<Config> {
    if !workspace.exists() {
        return Err(ConfigError::NotFound(workspace.to_path_buf()));
    }
    if !workspace.is_dir() {
        return Err(ConfigError::InvalidPath {
            path: workspace.to_path_buf(),
            expected: "directory",
        });
    }

    let config_path = workspace.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Err(ConfigError::NotFound(config_path));
    }
    if !config_path.is_file() {
        return Err(ConfigError::InvalidPath {
            path: config_path,
            expected: "file",
        });
    }

    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
        path: config_path.clone(),
        source,
    })?;

    debug!(path = %config_path.display(), "Loading configuration");
    parse_config(&content)
}

/// Parse a configuration document.
pub fn parse_config(content: &str) -> Result<Config> {
    if is_blank_document(content) {
        return Err(ConfigError::EmptyConfig);
    }

    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    if value.is_null() {
        return Err(ConfigError::EmptyConfig);
    }

    Ok(serde_yaml::from_value(value)?)
}

/// Whether the document holds nothing but whitespace, comments and markers.
fn is_blank_document(content: &str) -> bool {
    content.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_workspace_is_not_found() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");

        let result = load_config(&missing);
        assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_missing_config_file_is_not_found() {
        let temp = tempdir().unwrap();

        let result = load_config(temp.path());
        match result {
            Err(ConfigError::NotFound(path)) => assert!(path.ends_with(CONFIG_FILE_NAME)),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_workspace_file_is_invalid_path() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("workspace");
        fs::write(&file, "").unwrap();

        let result = load_config(&file);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPath {
                expected: "directory",
                ..
            })
        ));
    }

    #[test]
    fn test_config_directory_is_invalid_path() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join(CONFIG_FILE_NAME)).unwrap();

        let result = load_config(temp.path());
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPath {
                expected: "file",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_config() {
        let temp = tempdir().unwrap();
        write_config(temp.path(), "");

        assert!(matches!(
            load_config(temp.path()),
            Err(ConfigError::EmptyConfig)
        ));
    }

    #[test]
    fn test_comment_only_config_is_empty() {
        assert!(matches!(
            parse_config("# nothing here\n\n---\n"),
            Err(ConfigError::EmptyConfig)
        ));
        assert!(matches!(parse_config("~\n"), Err(ConfigError::EmptyConfig)));
    }

    #[test]
    fn test_empty_mapping_is_valid() {
        let config = parse_config("{}").unwrap();
        assert!(config.scripts.is_empty());
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let result = parse_config("scripts: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_scalar_document_is_parse_error() {
        let result = parse_config("just a string");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_valid_config() {
        let temp = tempdir().unwrap();
        write_config(
            temp.path(),
            "scripts:\n  build:\n    description: Builds\n    path: build.py\n",
        );

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.scripts.len(), 1);
        assert_eq!(
            config.scripts["build"].description.as_deref(),
            Some("Builds")
        );
    }

    #[test]
    fn test_default_workspace_under_home() {
        let dir = default_workspace().unwrap();
        assert!(dir.ends_with(DEFAULT_WORKSPACE_DIR));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidPath {
            path: PathBuf::from("/tmp/x"),
            expected: "directory",
        };
        assert_eq!(err.to_string(), "'/tmp/x' is not a directory");
        assert_eq!(ConfigError::EmptyConfig.to_string(), "Configuration is empty");
    }
}
