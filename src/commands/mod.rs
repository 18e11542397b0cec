//! Command model for escripts.
//!
//! This module provides:
//! - The command registry with script-over-alias resolution
//! - Schema-driven argument binding
//! - Alias template rendering

pub mod args;
mod registry;
pub mod template;

pub use args::{ArgumentError, Bindings};
pub use registry::{Command, CommandKind, CommandRegistry};
pub use template::TemplateError;
