//! Log drain for the console log stream.
//!
//! On device the drain runs in its own task and writes to a TX-only UART,
//! keeping log lines off the interactive console. The host binary drains to
//! stderr with the same formatting.
//!
//! ```text
//! CONSOLE_LOG_STREAM ──drain──▶ format_log_entry ──▶ UART TX / stderr
//! ```

use crate::logging::{format_to_buffer, LogEntry, LogStream};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::UartTxDriver;

/// Size of one formatted log line
pub const LINE_BUF_SIZE: usize = 192;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: 6,
        }
    }
}

/// Format log entry as `[timestamp_us] LEVEL: message\n`.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!(
            "[{:10}] {}: {}\n",
            entry.timestamp_us,
            entry.level.as_str(),
            entry.message()
        ),
    )
}

/// Drain every pending entry of `stream` into `sink`, one formatted line each.
///
/// A line reporting dropped entries follows if the stream overflowed.
/// Returns the number of entries drained.
pub fn drain_log_stream<const N: usize>(stream: &LogStream<N>, sink: &mut dyn FnMut(&[u8])) -> usize {
    let mut line = [0u8; LINE_BUF_SIZE];
    let mut count = 0;

    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut line);
        sink(&line[..len]);
        count += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let len = format_to_buffer(&mut line, format_args!("[WARN] log dropped: {}\n", dropped));
        sink(&line[..len]);
        stream.reset_dropped();
    }

    count
}

/// UART log consumer task.
///
/// Drains `stream` to `uart` forever, sleeping when there is nothing to do.
#[cfg(target_os = "espidf")]
pub fn uart_logger_task<const N: usize>(uart: &mut UartTxDriver<'_>, stream: &LogStream<N>) -> ! {
    loop {
        let drained = drain_log_stream(stream, &mut |line: &[u8]| {
            let _ = uart.write(line);
        });

        if drained == 0 {
            unsafe {
                esp_idf_svc::sys::vTaskDelay(10);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn test_format_log_entry() {
        let mut entry = LogEntry {
            timestamp_us: 1234567,
            level: LogLevel::Info,
            ..LogEntry::default()
        };
        entry.msg[..14].copy_from_slice(b"passthrough on");
        entry.len = 14;

        let mut buf = [0u8; LINE_BUF_SIZE];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: passthrough on\n");
    }

    #[test]
    fn test_drain_reports_drops() {
        let stream = LogStream::<2>::new();
        stream.push(1, LogLevel::Warn, b"a");
        stream.push(2, LogLevel::Warn, b"b");
        stream.push(3, LogLevel::Warn, b"c");

        let mut lines = Vec::new();
        let drained = drain_log_stream(&stream, &mut |line: &[u8]| {
            lines.push(String::from_utf8(line.to_vec()).unwrap())
        });

        assert_eq!(drained, 2);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("dropped: 1"));
        assert_eq!(stream.dropped(), 0);
    }
}
