//! # SerialConsole
//!
//! Interactive command console for ESP-IDF devices, with a raw passthrough
//! mode that is left by a timed escape-key gesture.
//!
//! ## Architecture
//!
//! ```text
//! UART RX ──▶ InputQueue ──▶ Console::poll ──┬─▶ EscapeDetector (passthrough)
//!                                            └─▶ lock gate ─▶ LineEditor
//!                                                              ├─▶ execute
//!                                                              └─▶ complete
//! ```
//!
//! - One task owns the [`Console`] and processes each byte to completion
//! - Producers only touch the lock-free [`InputQueue`]
//! - Commands live in an immutable [`CommandRegistry`] built at startup

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod console;
pub mod log_globals;
pub mod logging;
pub mod port;
pub mod queue;
pub mod uart_logger;

pub use config::{ConsoleConfig, Env, StaticEnv};
pub use console::{
    Candidates, CommandEntry, CommandRegistry, CompletionScratch, Console, ConsoleError,
    EscapeDetector, Session,
};
pub use log_globals::CONSOLE_LOG_STREAM;
pub use logging::{LogLevel, LogStream};
pub use port::ConsolePort;
pub use queue::InputQueue;
