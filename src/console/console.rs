//! Main console struct integrating all components
//!
//! Every input byte goes through the same pipeline, to completion, before the
//! next one is taken:
//!
//! ```text
//! byte ─┬─ passthrough ─▶ mirror ─▶ EscapeDetector ─▶ (exit passthrough)
//!       └─ interactive ─▶ lock gate ─▶ LineEditor ─┬─▶ execute
//!                                                   ├─▶ complete
//!                                                   └─▶ on_interrupt
//! ```

use core::fmt::Write;

use alloc::string::String;

use super::completion::{Candidates, CompletionScratch};
use super::editor::{EditorAction, LineEditor};
use super::parser::{parse_for_completion, parse_line};
use super::registry::{self, CommandRegistry};
use super::session::{ConsoleState, Session};
use super::ConsoleError;
use crate::config::{ConsoleConfig, Env, HOSTNAME_KEY};
use crate::logging::{LogLevel, LogStream};
use crate::port::ConsolePort;
use crate::queue::InputQueue;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Console context: the only owner of all console state.
pub struct Console<P: ConsolePort> {
    port: P,
    state: ConsoleState,
    registry: CommandRegistry,
    editor: LineEditor,
    completion: CompletionScratch,
}

impl<P: ConsolePort> Console<P> {
    /// Create a console. Passthrough (and the lock) start as configured.
    pub fn new(registry: CommandRegistry, port: P, config: ConsoleConfig) -> Self {
        Self {
            port,
            state: ConsoleState::new(config),
            registry,
            editor: LineEditor::new(),
            completion: CompletionScratch::new(),
        }
    }

    /// Log to `stream` instead of the global console log stream.
    pub fn with_log_stream(mut self, stream: &'static LogStream) -> Self {
        self.state.log = stream;
        self
    }

    /// Replace the completion arena (e.g. with a bounded one).
    pub fn with_completion_scratch(mut self, scratch: CompletionScratch) -> Self {
        self.completion = scratch;
        self
    }

    /// Seed the prompt from `hostname` and print the activation banner.
    pub fn init(&mut self, env: &dyn Env) {
        let mut hostname = None;
        env.with_value(HOSTNAME_KEY, &mut |value: &str| hostname = Some(String::from(value)));
        if let Some(hostname) = hostname.filter(|h| !h.is_empty()) {
            self.state.prompt = hostname;
        }

        let mut session = self.session();
        let _ = writeln!(session, "{}", VERSION);
        let _ = writeln!(session, "=== Press enter to activate this console ===");
        session.log(LogLevel::Info, format_args!("console ready"));
    }

    /// Tear down, handing back the port.
    pub fn shutdown(self) -> P {
        self.state.log(self.port.now_us(), LogLevel::Info, format_args!("console shutdown"));
        self.port
    }

    /// Process one input byte.
    pub fn insert(&mut self, byte: u8) {
        if self.state.passthrough {
            self.insert_passthrough(byte);
        } else if !self.state.locked || byte == self.state.config.unlock_key {
            self.insert_interactive(byte);
        }
    }

    /// Process a buffer, byte by byte.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.insert(b);
        }
    }

    /// Drain `queue`, returning the number of bytes processed.
    pub fn poll<const N: usize>(&mut self, queue: &InputQueue<N>) -> usize {
        let dropped = queue.take_dropped();
        if dropped > 0 {
            self.state.log(
                self.port.now_us(),
                LogLevel::Warn,
                format_args!("input queue full, {} bytes dropped", dropped),
            );
        }

        let mut count = 0;
        while let Some(byte) = queue.pop() {
            self.insert(byte);
            count += 1;
        }
        count
    }

    fn insert_passthrough(&mut self, byte: u8) {
        self.port.mirror(byte);

        let now = self.port.now_us();
        if self.state.escape.feed(byte, now, &self.state.config) {
            self.state.passthrough = false;
            self.state.locked = false;
            self.state.log(now, LogLevel::Info, format_args!("passthrough off"));

            let mut session = self.session();
            let _ = writeln!(session, "\nconsole on serial line");
            session.print_prompt();
        }
    }

    fn insert_interactive(&mut self, byte: u8) {
        let action = {
            let mut session = Session::new(&mut self.state, &mut self.port, self.registry);
            self.editor.insert_char(byte, &mut session)
        };

        match action {
            EditorAction::None => {}
            EditorAction::EmptyLine => self.session().print_prompt(),
            EditorAction::Submit => self.submit_line(),
            EditorAction::Complete => self.complete_line(),
            EditorAction::Interrupt => self.on_interrupt(),
        }
    }

    fn submit_line(&mut self) {
        let line = *self.editor.line();
        self.editor.clear();

        let parsed = parse_line(line.as_str());
        let mut session = Session::new(&mut self.state, &mut self.port, self.registry);
        if parsed.overflowed() {
            let _ = writeln!(session, "Too many arguments, line ignored");
        } else {
            // Failures are already reported on the console
            let _ = registry::execute(&mut session, parsed.argv());
        }
        session.print_prompt();
    }

    fn complete_line(&mut self) {
        let line = *self.editor.line();
        let parsed = parse_for_completion(line.as_str());
        let argv = parsed.argv();

        let candidates = self.completion.complete(&self.registry, argv);
        let mut session = Session::new(&mut self.state, &mut self.port, self.registry);
        if candidates.is_out_of_memory() {
            session.log(LogLevel::Warn, format_args!("{}", ConsoleError::CompletionAllocationFailure));
        }

        match candidates.len() {
            0 => {}
            1 => {
                let part = argv.first().copied().unwrap_or("");
                if let Some(name) = candidates.get(0) {
                    let mut rest = String::from(name.get(part.len()..).unwrap_or(""));
                    rest.push(' ');
                    self.editor.insert_str(&rest, &mut session);
                }
            }
            _ => {
                let _ = writeln!(session);
                if candidates.is_out_of_memory() {
                    print_list(&mut session, &candidates, "");
                } else {
                    let part = argv.first().copied().unwrap_or("");
                    print_list(&mut session, &candidates, part);
                    let common = common_prefix(&candidates, part);
                    if let Some(extra) = common.get(part.len()..) {
                        // Echo comes with the redraw below
                        self.editor.insert_str(extra, &mut NullWriter);
                    }
                }
                session.print_prompt();
                self.editor.redraw(&mut session);
            }
        }
    }

    /// Run `argv` as if it had been typed.
    pub fn execute(&mut self, argv: &[&str]) -> Result<(), ConsoleError> {
        registry::execute(&mut self.session(), argv)
    }

    /// Complete `argv` against the registry.
    pub fn complete(&mut self, argv: &[&str]) -> Candidates<'_> {
        self.completion.complete(&self.registry, argv)
    }

    /// Ctrl+C: let every command cancel, then force the console open.
    pub fn on_interrupt(&mut self) {
        let mut session = self.session();
        let _ = writeln!(session, "\nINTERRUPT");
        session.log(LogLevel::Info, format_args!("interrupt"));

        for cmd in self.registry.iter() {
            if let Some(interrupt) = cmd.interrupt {
                interrupt();
            }
        }

        self.session().lock(false);
    }

    /// Lock or unlock the console. Unlocking redraws the prompt.
    pub fn lock(&mut self, locked: bool) {
        self.session().lock(locked);
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    /// Enter or leave passthrough mode; the console is locked while it lasts.
    pub fn enable_passthrough(&mut self, enabled: bool) {
        self.session().enable_passthrough(enabled);
    }

    pub fn is_passthrough(&self) -> bool {
        self.state.passthrough
    }

    pub fn log_level(&self) -> LogLevel {
        self.state.log_level
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.state.log_level = level;
    }

    pub fn prompt(&self) -> &str {
        &self.state.prompt
    }

    /// Text currently being edited
    pub fn line(&self) -> &str {
        self.editor.line().as_str()
    }

    pub fn registry(&self) -> CommandRegistry {
        self.registry
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    fn session(&mut self) -> Session<'_> {
        Session::new(&mut self.state, &mut self.port, self.registry)
    }
}

fn print_list(out: &mut dyn Write, candidates: &Candidates<'_>, part: &str) {
    for (i, c) in candidates.iter().enumerate() {
        // The first of several matches is a suffix of the typed prefix
        if i == 0 {
            let _ = write!(out, "{}{}", part, c);
        } else {
            let _ = write!(out, "  {}", c);
        }
    }
    let _ = writeln!(out);
}

/// Longest prefix shared by all full candidate names.
fn common_prefix(candidates: &Candidates<'_>, part: &str) -> String {
    let mut names = candidates.iter().enumerate().map(|(i, c)| {
        let mut name = String::new();
        if i == 0 {
            name.push_str(part);
        }
        name.push_str(c);
        name
    });

    let Some(mut common) = names.next() else {
        return String::new();
    };
    for name in names {
        let len = common
            .bytes()
            .zip(name.bytes())
            .take_while(|(a, b)| a == b)
            .count();
        common.truncate(len);
    }
    common
}

struct NullWriter;

impl Write for NullWriter {
    fn write_str(&mut self, _s: &str) -> core::fmt::Result {
        Ok(())
    }
}
