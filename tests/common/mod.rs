//! Shared test port

#![allow(dead_code)]

use esp_serial_console::{CommandRegistry, Console, ConsoleConfig, ConsolePort, LogStream};

/// Captures console output and mirrored bytes; time is set by the test.
pub struct TestPort {
    pub out: String,
    pub mirrored: Vec<u8>,
    pub now_us: u64,
}

impl TestPort {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            mirrored: Vec::new(),
            now_us: 0,
        }
    }
}

impl ConsolePort for TestPort {
    fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn mirror(&mut self, byte: u8) {
        self.mirrored.push(byte);
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}

/// Console with its own log stream, so parallel tests do not share one.
pub fn console(registry: CommandRegistry, config: ConsoleConfig) -> Console<TestPort> {
    let log: &'static LogStream = Box::leak(Box::new(LogStream::new()));
    Console::new(registry, TestPort::new(), config).with_log_stream(log)
}

/// Take everything written so far.
pub fn take_output(console: &mut Console<TestPort>) -> String {
    std::mem::take(&mut console.port_mut().out)
}
