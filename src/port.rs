//! Console backend capabilities.
//!
//! One implementation per transport: UART on device, stdio in the host
//! binary, a capture buffer in tests.

/// Everything the console needs from its transport.
pub trait ConsolePort {
    /// Write console text. Only called while the console is unlocked.
    fn write_str(&mut self, s: &str);

    /// Diagnostic mirror of a byte received in passthrough mode.
    ///
    /// Called for every passthrough byte, escape or not.
    fn mirror(&mut self, byte: u8);

    /// Monotonic time in microseconds.
    fn now_us(&self) -> u64;
}

impl<P: ConsolePort + ?Sized> ConsolePort for &mut P {
    fn write_str(&mut self, s: &str) {
        (**self).write_str(s)
    }

    fn mirror(&mut self, byte: u8) {
        (**self).mirror(byte)
    }

    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Format the diagnostic mirror of `byte`: `@<char>,<code>`.
pub fn write_mirror(out: &mut dyn core::fmt::Write, byte: u8) -> core::fmt::Result {
    write!(out, "@{},{}", byte as char, byte)
}

#[cfg(target_os = "espidf")]
pub use uart::UartPort;

#[cfg(target_os = "espidf")]
mod uart {
    use super::{write_mirror, ConsolePort};
    use esp_idf_svc::hal::uart::UartTxDriver;

    /// Console on the TX half of a UART, diagnostics on the ROM printf channel.
    ///
    /// The RX half belongs to the reader feeding the input queue.
    pub struct UartPort<'d> {
        tx: UartTxDriver<'d>,
    }

    impl<'d> UartPort<'d> {
        pub fn new(tx: UartTxDriver<'d>) -> Self {
            Self { tx }
        }
    }

    impl ConsolePort for UartPort<'_> {
        fn write_str(&mut self, s: &str) {
            // Output errors have nowhere to go
            let _ = self.tx.write(s.as_bytes());
        }

        fn mirror(&mut self, byte: u8) {
            let mut line = [0u8; 16];
            let len = crate::logging::format_to_buffer(
                &mut line[..15],
                format_args!("{}", MirrorFmt(byte)),
            );
            // NUL-terminated for the ROM printf
            line[len] = 0;
            unsafe {
                esp_idf_svc::sys::esp_rom_printf(b"%s\0".as_ptr() as *const _, line.as_ptr());
            }
        }

        fn now_us(&self) -> u64 {
            // SAFETY: esp_timer_get_time is always safe to call
            unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
        }
    }

    struct MirrorFmt(u8);

    impl core::fmt::Display for MirrorFmt {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write_mirror(f, self.0)
        }
    }
}
