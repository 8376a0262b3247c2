//! Passthrough escape detector
//!
//! While passthrough is active every byte is forwarded raw; the only way back
//! to the console is pressing the escape key `esc_count` times. Two presses
//! closer together than `esc_space_us` break the sequence and start it over.
//!
//! States are implicit in `count`: 0 is idle, 1.. is counting.

use crate::config::ConsoleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EscapeDetector {
    /// Time of the last escape press
    last_esc_us: u64,
    /// Escape presses in the current sequence
    count: u8,
}

impl EscapeDetector {
    pub const fn new() -> Self {
        Self { last_esc_us: 0, count: 0 }
    }

    /// Feed one passthrough byte received at `now_us`.
    ///
    /// Returns `true` when the sequence is complete and passthrough should end.
    /// Requires `config.esc_count >= 2`.
    pub fn feed(&mut self, byte: u8, now_us: u64, config: &ConsoleConfig) -> bool {
        if byte != config.escape_key {
            self.count = 0;
            return false;
        }

        let mut complete = false;
        self.count = self.count.saturating_add(1);
        if self.count > 1 {
            if now_us.wrapping_sub(self.last_esc_us) < config.esc_space_us {
                self.count = 0;
            } else if self.count == config.esc_count {
                self.count = 0;
                complete = true;
            }
        }
        self.last_esc_us = now_us;
        complete
    }

    /// Escape presses counted so far.
    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
