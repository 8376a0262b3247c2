//! Module: config
//!
//! Purpose: Console tunables and named startup lookups.
//!
//! Architecture:
//! - `ConsoleConfig`: compile-time defaults, overridable per console instance
//! - `Env`: read-only named lookup (`hostname`), backed by NVS on device
//!   and by `StaticEnv` on host
//!
//! A missing value is never an error: callers fall back to the default.

use crate::logging::LogLevel;

pub mod nvs;

pub use nvs::{NvsEnv, NvsError, NVS_NAMESPACE};

/// ESC: repeated in passthrough mode to return to the console.
pub const ESC_KEY: u8 = 0x1B;

/// ETX (Ctrl+C): the only byte accepted while the console is locked.
pub const UNLOCK_KEY: u8 = 0x03;

/// Number of escape presses that leave passthrough mode.
pub const ESC_COUNT: u8 = 3;

/// Minimum gap between two escape presses (µs). Shorter gaps break the sequence.
pub const ESC_SPACE_US: u64 = 200_000;

/// Whether the console boots in passthrough mode.
pub const PASSTHROUGH_AT_BOOT: bool = false;

/// Column width of command names in `help` output.
pub const HELP_COLUMN_WIDTH: usize = 10;

/// Capacity of the input byte queue (power of 2).
pub const INPUT_QUEUE_SIZE: usize = 256;

/// Console log level at boot.
pub const LOG_LEVEL_DEFAULT: LogLevel = LogLevel::Info;

/// Prompt used when no `hostname` is configured.
pub const DEFAULT_PROMPT: &str = "console";

/// Environment key seeding the prompt.
pub const HOSTNAME_KEY: &str = "hostname";

/// Console tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub escape_key: u8,
    pub unlock_key: u8,
    pub esc_count: u8,
    pub esc_space_us: u64,
    pub passthrough_at_boot: bool,
    pub help_column_width: usize,
    pub log_level: LogLevel,
}

impl ConsoleConfig {
    /// Compile-time defaults.
    pub const DEFAULT: Self = Self {
        escape_key: ESC_KEY,
        unlock_key: UNLOCK_KEY,
        esc_count: ESC_COUNT,
        esc_space_us: ESC_SPACE_US,
        passthrough_at_boot: PASSTHROUGH_AT_BOOT,
        help_column_width: HELP_COLUMN_WIDTH,
        log_level: LOG_LEVEL_DEFAULT,
    };
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Named configuration lookup.
pub trait Env {
    /// Look up `key`, calling `f` with the value if present.
    ///
    /// The value is only borrowed for the duration of the call so that
    /// backends can read into a stack buffer.
    fn with_value(&self, key: &str, f: &mut dyn FnMut(&str));
}

/// Fixed key/value table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticEnv {
    entries: &'static [(&'static str, &'static str)],
}

impl StaticEnv {
    pub const EMPTY: Self = Self { entries: &[] };

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl Env for StaticEnv {
    fn with_value(&self, key: &str, f: &mut dyn FnMut(&str)) {
        if let Some(value) = self.get(key) {
            f(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_env_lookup() {
        static ENV: StaticEnv = StaticEnv::new(&[("hostname", "bench"), ("hostname", "second")]);

        assert_eq!(ENV.get("hostname"), Some("bench"));
        assert_eq!(ENV.get("missing"), None);
    }

    #[test]
    fn test_env_callback_not_called_when_missing() {
        let mut called = false;
        StaticEnv::EMPTY.with_value(HOSTNAME_KEY, &mut |_: &str| called = true);
        assert!(!called);
    }

    #[test]
    fn test_default_config() {
        let cfg = ConsoleConfig::default();
        assert_eq!(cfg.escape_key, 0x1B);
        assert_eq!(cfg.unlock_key, 0x03);
        assert!(cfg.esc_count > 1);
        assert!(INPUT_QUEUE_SIZE.is_power_of_two());
    }
}
