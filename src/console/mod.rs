//! Serial console: command registry, dispatcher, completion and passthrough
//!
//! Single-threaded: one task owns the [`Console`] and feeds it bytes.
//! Static buffers except for the completion arena.

pub mod builtins;
#[allow(clippy::module_inception)]
pub mod console;
pub mod completion;
pub mod editor;
pub mod error;
pub mod escape;
pub mod parser;
pub mod registry;
pub mod session;

pub use completion::{Candidates, CompletionScratch, OUT_OF_MEMORY};
pub use console::{Console, VERSION};
pub use editor::{EditorAction, LineEditor};
pub use error::ConsoleError;
pub use escape::EscapeDetector;
pub use parser::{parse_line, ParsedLine};
pub use registry::{execute, CommandEntry, CommandHandler, CommandRegistry, HELP};
pub use session::Session;
