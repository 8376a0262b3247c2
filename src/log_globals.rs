//! Global log stream instances.

use crate::logging::LogStream;

/// Console log stream.
///
/// Written by the console task (and by input producers reporting drops),
/// drained by the UART log task.
pub static CONSOLE_LOG_STREAM: LogStream = LogStream::new();
