//! SerialConsole - Main entry point
//!
//! Device (espidf):
//! 1. Console on UART0, input fed by a reader thread through the input queue
//! 2. Prompt seeded from NVS `hostname`
//! 3. Console log drained to a TX-only UART1
//!
//! Host: the same console on stdin/stdout, log lines on stderr.

use core::fmt::Write;

use esp_serial_console::console::builtins;
use esp_serial_console::{CommandEntry, CommandRegistry, InputQueue, Session};

static COMMANDS: &[CommandEntry] = &[
    builtins::PASSTHROUGH,
    builtins::LOGLEVEL,
    builtins::VERSION_CMD,
    CommandEntry::new("echo", "Print arguments", cmd_echo),
    CommandEntry::new("uptime", "Time since boot", cmd_uptime).args(None, Some(1)),
];

static REGISTRY: CommandRegistry = CommandRegistry::new(COMMANDS);

/// Bytes from the reader waiting for the console task
static INPUT: InputQueue = InputQueue::new();

fn cmd_echo(session: &mut Session<'_>, argv: &[&str]) -> i32 {
    let mut first = true;
    for arg in &argv[1..] {
        let _ = write!(session, "{}{}", if first { "" } else { " " }, arg);
        first = false;
    }
    let _ = writeln!(session);
    0
}

fn cmd_uptime(session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    let secs = session.now_us() / 1_000_000;
    let _ = writeln!(session, "uptime: {}s", secs);
    0
}

#[cfg(target_os = "espidf")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use esp_idf_svc::hal::delay::{FreeRtos, BLOCK};
    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{config::Config, UartDriver, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;

    use esp_serial_console::config::NvsEnv;
    use esp_serial_console::port::UartPort;
    use esp_serial_console::uart_logger::{uart_logger_task, UartLoggerConfig};
    use esp_serial_console::{Console, ConsoleConfig, StaticEnv, CONSOLE_LOG_STREAM};

    // Initialize ESP-IDF
    esp_idf_svc::sys::link_patches();

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // Log drain on UART1
    let log_config = UartLoggerConfig::default();
    let mut log_uart = UartTxDriver::new(
        peripherals.uart1,
        pins.gpio6,
        Option::<AnyIOPin>::None, // CTS
        Option::<AnyIOPin>::None, // RTS
        &Config::default().baudrate(Hertz(log_config.baud_rate)),
    )?;
    std::thread::Builder::new()
        .stack_size(4096)
        .spawn(move || uart_logger_task(&mut log_uart, &CONSOLE_LOG_STREAM))?;

    // Console on UART0
    #[cfg(feature = "esp32p4")]
    let (tx_pin, rx_pin) = (pins.gpio37, pins.gpio38);
    #[cfg(not(feature = "esp32p4"))]
    let (tx_pin, rx_pin) = (pins.gpio43, pins.gpio44);

    let uart = UartDriver::new(
        peripherals.uart0,
        tx_pin,
        rx_pin,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &Config::default().baudrate(Hertz(115_200)),
    )?;
    let (tx, rx) = uart.into_split();

    std::thread::Builder::new()
        .stack_size(4096)
        .spawn(move || {
            let mut buf = [0u8; 64];
            loop {
                match rx.read(&mut buf, BLOCK) {
                    Ok(n) => {
                        INPUT.push_slice(&buf[..n]);
                    }
                    Err(_) => FreeRtos::delay_ms(10),
                }
            }
        })?;

    let mut console = Console::new(REGISTRY, UartPort::new(tx), ConsoleConfig::default());
    match EspDefaultNvsPartition::take()
        .map_err(esp_serial_console::config::NvsError::InitFailed)
        .and_then(NvsEnv::open)
    {
        Ok(env) => console.init(&env),
        Err(_) => console.init(&StaticEnv::EMPTY),
    }

    loop {
        if console.poll(&INPUT) == 0 {
            FreeRtos::delay_ms(10);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    use std::io::{Read, Write as _};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    use esp_serial_console::port::write_mirror;
    use esp_serial_console::uart_logger::drain_log_stream;
    use esp_serial_console::{Console, ConsoleConfig, ConsolePort, Env, CONSOLE_LOG_STREAM};

    /// Console on stdout, passthrough mirror on stderr
    struct StdioPort {
        start: Instant,
    }

    impl ConsolePort for StdioPort {
        fn write_str(&mut self, s: &str) {
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(s.as_bytes());
            let _ = stdout.flush();
        }

        fn mirror(&mut self, byte: u8) {
            let mut line = String::new();
            let _ = write_mirror(&mut line, byte);
            eprintln!("{}", line);
        }

        fn now_us(&self) -> u64 {
            self.start.elapsed().as_micros() as u64
        }
    }

    /// `hostname` from `$CONSOLE_HOSTNAME`
    struct ProcessEnv;

    impl Env for ProcessEnv {
        fn with_value(&self, key: &str, f: &mut dyn FnMut(&str)) {
            let var = format!("CONSOLE_{}", key.to_ascii_uppercase());
            if let Ok(value) = std::env::var(var) {
                f(&value);
            }
        }
    }

    static EOF: AtomicBool = AtomicBool::new(false);

    std::thread::spawn(|| {
        let mut buf = [0u8; 64];
        let mut stdin = std::io::stdin();
        loop {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    INPUT.push_slice(&buf[..n]);
                }
            }
        }
        EOF.store(true, Ordering::Release);
    });

    let port = StdioPort {
        start: Instant::now(),
    };
    let mut console = Console::new(REGISTRY, port, ConsoleConfig::default());
    console.init(&ProcessEnv);

    let mut stderr_sink = |line: &[u8]| {
        let _ = std::io::stderr().write_all(line);
    };

    loop {
        let eof = EOF.load(Ordering::Acquire);
        let processed = console.poll(&INPUT);
        drain_log_stream(&CONSOLE_LOG_STREAM, &mut stderr_sink);

        if eof && INPUT.is_empty() {
            break;
        }
        if processed == 0 {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    console.shutdown();
    drain_log_stream(&CONSOLE_LOG_STREAM, &mut stderr_sink);
}
