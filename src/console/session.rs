//! Console state and the handle given to command handlers

use core::fmt;

use alloc::string::String;

use super::escape::EscapeDetector;
use super::registry::CommandRegistry;
use crate::config::{ConsoleConfig, DEFAULT_PROMPT};
use crate::log_globals::CONSOLE_LOG_STREAM;
use crate::logging::{LogLevel, LogStream};
use crate::port::ConsolePort;
use crate::rt_log;

/// Mutable console state, owned by the console task.
pub(crate) struct ConsoleState {
    pub(crate) config: ConsoleConfig,
    pub(crate) locked: bool,
    pub(crate) passthrough: bool,
    pub(crate) escape: EscapeDetector,
    pub(crate) log_level: LogLevel,
    pub(crate) prompt: String,
    pub(crate) log: &'static LogStream,
}

impl ConsoleState {
    pub(crate) fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            locked: config.passthrough_at_boot,
            passthrough: config.passthrough_at_boot,
            escape: EscapeDetector::new(),
            log_level: config.log_level,
            prompt: String::from(DEFAULT_PROMPT),
            log: &CONSOLE_LOG_STREAM,
        }
    }

    pub(crate) fn log(&self, now_us: u64, level: LogLevel, args: fmt::Arguments<'_>) {
        if level <= self.log_level {
            rt_log!(level, self.log, now_us, "{}", args);
        }
    }
}

/// Gated console output plus the controls a command may use.
///
/// Writes are discarded while the console is locked.
pub struct Session<'a> {
    state: &'a mut ConsoleState,
    port: &'a mut dyn ConsolePort,
    registry: CommandRegistry,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        state: &'a mut ConsoleState,
        port: &'a mut dyn ConsolePort,
        registry: CommandRegistry,
    ) -> Self {
        Self { state, port, registry }
    }

    /// The command table
    pub fn registry(&self) -> CommandRegistry {
        self.registry
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.state.config
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    /// Lock or unlock the console. Unlocking redraws the prompt.
    pub fn lock(&mut self, locked: bool) {
        self.state.locked = locked;
        if !locked {
            self.print_prompt();
        }
    }

    pub fn is_passthrough(&self) -> bool {
        self.state.passthrough
    }

    /// Enter or leave passthrough mode; the console is locked while it lasts.
    pub fn enable_passthrough(&mut self, enabled: bool) {
        self.state.passthrough = enabled;
        self.state.escape.reset();
        self.log(
            LogLevel::Info,
            format_args!("passthrough {}", if enabled { "on" } else { "off" }),
        );
        self.lock(enabled);
    }

    pub fn log_level(&self) -> LogLevel {
        self.state.log_level
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.state.log_level = level;
    }

    /// Log to the console log stream, filtered by the current level.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.state.log(self.port.now_us(), level, args);
    }

    pub fn now_us(&self) -> u64 {
        self.port.now_us()
    }

    pub fn prompt(&self) -> &str {
        &self.state.prompt
    }

    /// Print `<prompt>> `
    pub fn print_prompt(&mut self) {
        if !self.state.locked {
            self.port.write_str(&self.state.prompt);
            self.port.write_str("> ");
        }
    }
}

impl fmt::Write for Session<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if !self.state.locked {
            self.port.write_str(s);
        }
        Ok(())
    }
}
