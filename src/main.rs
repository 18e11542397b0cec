//! escripts - a personal command dispatcher
//!
//! Runs scripts and shell aliases declared in a workspace `config.yml`.

mod cli;
mod commands;
mod config;
mod dispatcher;
mod error;
mod exec;
mod logging;

use std::io::{self, Write};

use clap::Parser;
use tracing::error;

use crate::commands::CommandRegistry;
use crate::config::{load_config, Settings};
use crate::dispatcher::{Dispatcher, Request};
use crate::error::AppError;
use crate::exec::SystemLauncher;

fn main() {
    let args = cli::Args::parse();

    if let Err(e) = logging::init() {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    let exit_code = match run(&args) {
        Ok(()) => 0,
        Err(err) => {
            if !err.is_reported() {
                error!("{}", err);
            }
            if let Some(hint) = err.suggested_action() {
                eprintln!("hint: {}", hint);
            }
            err.exit_code()
        }
    };

    logging::shutdown(exit_code);
    std::process::exit(exit_code);
}

fn run(args: &cli::Args) -> Result<(), AppError> {
    let request = args.request();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Usage needs no workspace.
    if request == Request::Usage {
        writeln!(out, "{}", dispatcher::USAGE)?;
        return Ok(());
    }

    let settings = Settings::resolve(args.workspace.as_deref())?;
    let config = load_config(&settings.workspace)?;
    let registry = CommandRegistry::from_config(&config);

    Dispatcher::new(&registry, &settings, SystemLauncher).dispatch(&request, &mut out)
}
