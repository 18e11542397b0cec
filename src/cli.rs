//! CLI argument parsing via clap.
//!
//! Only the global options are parsed here. The command name and every
//! token after it are captured verbatim and bound later against the
//! command's own schema.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::dispatcher::Request;

/// Run personal scripts and shell aliases declared in ~/.escripts/config.yml.
#[derive(Debug, Parser)]
#[command(name = "escripts", version)]
pub struct Args {
    /// List all scripts and aliases with their descriptions.
    #[arg(long = "list")]
    pub list: bool,

    /// Workspace directory holding config.yml (default: ~/.escripts).
    #[arg(short = 'w', long = "workspace", env = "ESCRIPTS_HOME", value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Command name followed by its own arguments. Any leading token that is
    /// not a global option, hyphenated or not, is taken as the name.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Args {
    /// Turn the parsed arguments into a dispatcher request.
    pub fn request(&self) -> Request {
        if self.list {
            return Request::List;
        }
        let mut tokens = self
            .command
            .iter()
            .map(|t| t.to_string_lossy().into_owned());
        match tokens.next() {
            Some(name) => Request::Run {
                name,
                args: tokens.collect(),
            },
            None => Request::Usage,
        }
    }
}
