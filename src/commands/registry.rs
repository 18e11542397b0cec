//! Command registry built from the loaded configuration.
//!
//! Provides name lookup with scripts taking priority over aliases, the
//! `--list` rendering and per-command help.

use std::io::{self, Write};

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::args::OptionTable;
use crate::config::Config;

/// A runnable command.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Name used on the command line.
    pub name: String,
    /// Description shown by `--list` and `--help`.
    pub description: String,
    /// What running the command does.
    pub kind: CommandKind,
    /// Options accepted by the command.
    pub options: OptionTable,
}

/// The two kinds of definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Run a workspace file through the interpreter.
    Script { path: Option<String> },
    /// Run a shell command template.
    Alias { command: Option<String> },
}

impl CommandKind {
    pub fn section(&self) -> Section {
        match self {
            Self::Script { .. } => Section::Scripts,
            Self::Alias { .. } => Section::Aliases,
        }
    }
}

/// Configuration sections, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Scripts,
    Aliases,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Scripts, Section::Aliases];

    /// Get the display name for this section.
    pub fn display(&self) -> &'static str {
        match self {
            Self::Scripts => "Scripts",
            Self::Aliases => "Aliases",
        }
    }
}

impl Command {
    /// Print per-command help.
    pub fn write_help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Command: {}", self.name)?;
        writeln!(out, "Description: {}", self.description)?;
        if !self.options.is_empty() {
            writeln!(out, "Arguments:")?;
            for opt in self.options.options() {
                match opt.display_default() {
                    Some(default) => writeln!(
                        out,
                        "\t--{} [default: {}] - {}",
                        opt.name, default, opt.description
                    )?,
                    None => writeln!(out, "\t--{} - {}", opt.name, opt.description)?,
                }
            }
        }
        Ok(())
    }
}

/// Registry of all configured commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// Entries per section, in file order.
    scripts: Vec<Command>,
    aliases: Vec<Command>,
    /// Resolution index: name to the entry that wins.
    index: IndexMap<String, (Section, usize)>,
}

impl CommandRegistry {
    /// Build the registry, constructing each command's option table.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::default();

        for (name, def) in &config.scripts {
            registry.register(Command {
                name: name.clone(),
                description: def.description.clone().unwrap_or_default(),
                kind: CommandKind::Script {
                    path: def.path.clone(),
                },
                options: OptionTable::from_schema(&def.args),
            });
        }

        for (name, def) in &config.aliases {
            registry.register(Command {
                name: name.clone(),
                description: def.description.clone().unwrap_or_default(),
                kind: CommandKind::Alias {
                    command: def.command.clone(),
                },
                options: OptionTable::from_schema(&def.args),
            });
        }

        debug!(
            scripts = registry.scripts.len(),
            aliases = registry.aliases.len(),
            "Command registry built"
        );
        registry
    }

    fn register(&mut self, command: Command) {
        let section = command.kind.section();
        let entries = match section {
            Section::Scripts => &mut self.scripts,
            Section::Aliases => &mut self.aliases,
        };

        if self.index.contains_key(&command.name) {
            warn!(command = %command.name, "Alias is shadowed by a script with the same name");
        } else {
            self.index
                .insert(command.name.clone(), (section, entries.len()));
        }
        entries.push(command);
    }

    /// Look up a command by name. Scripts win over aliases.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index
            .get(name)
            .and_then(|&(section, i)| self.section(section).get(i))
    }

    /// All entries declared in a section, in file order.
    pub fn section(&self, section: Section) -> &[Command] {
        match section {
            Section::Scripts => &self.scripts,
            Section::Aliases => &self.aliases,
        }
    }

    /// Print the `--list` output.
    pub fn write_list(&self, out: &mut dyn Write) -> io::Result<()> {
        for section in Section::ALL {
            writeln!(out, "{}:", section.display())?;
            let entries = self.section(section);
            if entries.is_empty() {
                writeln!(out, "\tEmpty")?;
            }
            for cmd in entries {
                writeln!(out, "\t- {}: {}", cmd.name, cmd.description)?;
            }
        }
        Ok(())
    }
}
