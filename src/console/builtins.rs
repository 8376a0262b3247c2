//! Standard commands an application may add to its registry.
//!
//! ```ignore
//! static COMMANDS: &[CommandEntry] = &[builtins::PASSTHROUGH, builtins::LOGLEVEL, my_cmd];
//! ```

use core::fmt::Write;

use super::console::VERSION;
use super::registry::CommandEntry;
use super::session::Session;
use crate::logging::LogLevel;

/// `passthrough`: forward raw input until the escape gesture
pub const PASSTHROUGH: CommandEntry =
    CommandEntry::new("passthrough", "Forward raw input until the escape sequence", cmd_passthrough)
        .args(None, Some(1));

/// `loglevel [level]`: show or set the console log level
pub const LOGLEVEL: CommandEntry =
    CommandEntry::new("loglevel", "Show or set console log level", cmd_loglevel)
        .args(None, Some(2));

/// `version`: firmware version
pub const VERSION_CMD: CommandEntry =
    CommandEntry::new("version", "Show firmware version", cmd_version).args(None, Some(1));

fn cmd_passthrough(session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    let esc_count = session.config().esc_count;
    let _ = writeln!(session, "passthrough on, press ESC {} times to return", esc_count);
    session.enable_passthrough(true);
    0
}

fn cmd_loglevel(session: &mut Session<'_>, argv: &[&str]) -> i32 {
    let Some(&arg) = argv.get(1) else {
        let level = session.log_level();
        let _ = writeln!(session, "loglevel={}", level.as_str());
        return 0;
    };

    match LogLevel::parse(arg) {
        Some(level) => {
            session.set_log_level(level);
            let _ = writeln!(session, "loglevel={}", level.as_str());
            0
        }
        None => {
            let _ = write!(session, "invalid level '{}', one of:", arg);
            for level in LogLevel::ALL {
                let _ = write!(session, " {}", level.as_str());
            }
            let _ = writeln!(session);
            1
        }
    }
}

fn cmd_version(session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    let _ = writeln!(session, "{}", VERSION);
    0
}
