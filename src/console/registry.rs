//! Command registry and dispatcher
//!
//! The registry is a fixed table built once at startup. The built-in `help`
//! entry always comes first, followed by the application's commands in
//! declaration order. Order matters twice: it is the `help` listing order,
//! and on duplicate names the first entry wins.

use core::fmt::Write;

use super::session::Session;
use super::ConsoleError;
use crate::logging::LogLevel;

/// Command handler. `argv[0]` is the command name; the return code is only logged.
pub type CommandHandler = fn(&mut Session<'_>, &[&str]) -> i32;

/// Command descriptor
#[derive(Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub handler: CommandHandler,
    pub help: &'static str,
    /// Minimum `argv.len()` (command name included), `None` for no minimum
    pub required_args: Option<usize>,
    /// Maximum `argv.len()` (command name included), `None` for no maximum
    pub maximum_args: Option<usize>,
    /// Called on Ctrl+C so long-running work can cancel
    pub interrupt: Option<fn()>,
}

impl CommandEntry {
    /// Entry without argument bounds or interrupt callback.
    pub const fn new(name: &'static str, help: &'static str, handler: CommandHandler) -> Self {
        Self {
            name,
            handler,
            help,
            required_args: None,
            maximum_args: None,
            interrupt: None,
        }
    }

    /// Bound `argv.len()` to `required..=maximum`.
    pub const fn args(mut self, required: Option<usize>, maximum: Option<usize>) -> Self {
        self.required_args = required;
        self.maximum_args = maximum;
        self
    }

    pub const fn on_interrupt(mut self, interrupt: fn()) -> Self {
        self.interrupt = Some(interrupt);
        self
    }
}

/// Built-in `help`, always at registry position zero
pub static HELP: CommandEntry = CommandEntry::new("help", "Show this message", cmd_help);

/// Immutable, ordered command table
#[derive(Clone, Copy)]
pub struct CommandRegistry {
    commands: &'static [CommandEntry],
}

impl CommandRegistry {
    /// Registry holding only `help`.
    pub const EMPTY: Self = Self::new(&[]);

    pub const fn new(commands: &'static [CommandEntry]) -> Self {
        Self { commands }
    }

    /// All entries in registry order, `help` first
    pub fn iter(&self) -> impl Iterator<Item = &'static CommandEntry> + Clone {
        let commands: &'static [CommandEntry] = self.commands;
        core::iter::once(&HELP).chain(commands.iter())
    }

    /// Number of entries, `help` included
    pub fn len(&self) -> usize {
        self.commands.len() + 1
    }

    /// Never empty: `help` is always registered.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// First entry named `name`
    pub fn find(&self, name: &str) -> Option<&'static CommandEntry> {
        self.iter().find(|c| c.name == name)
    }

    /// Get all command names for completion
    pub fn names(&self) -> impl Iterator<Item = &'static str> + Clone {
        self.iter().map(|c| c.name)
    }
}

/// Resolve `argv[0]`, check the argument count and run the handler.
///
/// Every failure is reported on the console before returning; the handler is
/// not invoked on failure. An empty `argv` does nothing.
pub fn execute(session: &mut Session<'_>, argv: &[&str]) -> Result<(), ConsoleError> {
    let Some(&name) = argv.first() else {
        return Ok(());
    };
    let argc = argv.len();

    let Some(cmd) = session.registry().find(name) else {
        let _ = writeln!(session, "Command {} not found, type 'help' for a list", name);
        session.log(LogLevel::Debug, format_args!("unknown command '{}'", name));
        return Err(ConsoleError::UnknownCommand);
    };

    if let Some(required) = cmd.required_args {
        if argc < required {
            let _ = writeln!(
                session,
                "Command {} requires at least {} args, {} given",
                name, required, argc
            );
            let err = ConsoleError::TooFewArgs { required, given: argc };
            session.log(LogLevel::Debug, format_args!("'{}': {}", name, err));
            return Err(err);
        }
    }

    if let Some(maximum) = cmd.maximum_args {
        if argc > maximum {
            let _ = writeln!(
                session,
                "Command {} takes a maximum of {} args, {} given",
                name, maximum, argc
            );
            let err = ConsoleError::TooManyArgs { maximum, given: argc };
            session.log(LogLevel::Debug, format_args!("'{}': {}", name, err));
            return Err(err);
        }
    }

    let rc = (cmd.handler)(session, argv);
    if rc != 0 {
        session.log(LogLevel::Debug, format_args!("'{}' returned {}", name, rc));
    }
    Ok(())
}

fn cmd_help(session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    let width = session.config().help_column_width;
    let registry = session.registry();
    for c in registry.iter() {
        let _ = writeln!(session, "{:<width$} - {}", c.name, c.help, width = width);
    }
    0
}
