//! Registry and dispatcher tests

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{console, take_output};
use esp_serial_console::console::builtins;
use esp_serial_console::{CommandEntry, CommandRegistry, ConsoleConfig, ConsoleError, Session};

static PAIR_CALLS: AtomicUsize = AtomicUsize::new(0);
static FAILING_CALLS: AtomicUsize = AtomicUsize::new(0);
static FIRST_DUP_CALLS: AtomicUsize = AtomicUsize::new(0);
static SECOND_DUP_CALLS: AtomicUsize = AtomicUsize::new(0);

fn cmd_pair(_session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    PAIR_CALLS.fetch_add(1, Ordering::SeqCst);
    0
}

fn cmd_failing(_session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    FAILING_CALLS.fetch_add(1, Ordering::SeqCst);
    -5
}

fn cmd_dup_first(_session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    FIRST_DUP_CALLS.fetch_add(1, Ordering::SeqCst);
    0
}

fn cmd_dup_second(_session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    SECOND_DUP_CALLS.fetch_add(1, Ordering::SeqCst);
    0
}

fn cmd_noop(_session: &mut Session<'_>, _argv: &[&str]) -> i32 {
    0
}

static COMMANDS: &[CommandEntry] = &[
    CommandEntry::new("pair", "Needs exactly one argument", cmd_pair).args(Some(2), Some(2)),
    CommandEntry::new("failing", "Handler reports failure", cmd_failing),
    CommandEntry::new("dup", "First duplicate", cmd_dup_first),
    CommandEntry::new("dup", "Second duplicate", cmd_dup_second),
    builtins::LOGLEVEL,
];

static REGISTRY: CommandRegistry = CommandRegistry::new(COMMANDS);

#[test]
fn test_help_is_first_entry() {
    let names: Vec<&str> = REGISTRY.names().collect();
    assert_eq!(names, ["help", "pair", "failing", "dup", "dup", "loglevel"]);
    assert_eq!(REGISTRY.len(), 6);
}

#[test]
fn test_help_lists_every_command_in_order() {
    let mut console = console(REGISTRY, ConsoleConfig::default());

    assert_eq!(console.execute(&["help"]), Ok(()));
    let out = take_output(&mut console);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), REGISTRY.len());
    for (line, cmd) in lines.iter().zip(REGISTRY.iter()) {
        assert_eq!(*line, format!("{:<10} - {}", cmd.name, cmd.help));
    }
    assert_eq!(lines[0], "help       - Show this message");
}

#[test]
fn test_help_ignores_arguments() {
    let mut console = console(REGISTRY, ConsoleConfig::default());

    assert_eq!(console.execute(&["help", "pair", "extra"]), Ok(()));
    assert_eq!(take_output(&mut console).lines().count(), REGISTRY.len());
}

#[test]
fn test_help_only_registry() {
    let mut console = console(CommandRegistry::EMPTY, ConsoleConfig::default());

    assert_eq!(console.execute(&["help"]), Ok(()));
    assert_eq!(take_output(&mut console), "help       - Show this message\n");
}

#[test]
fn test_unknown_command() {
    let mut console = console(REGISTRY, ConsoleConfig::default());

    assert_eq!(console.execute(&["bogus"]), Err(ConsoleError::UnknownCommand));
    assert!(take_output(&mut console).contains("Command bogus not found, type 'help' for a list"));
}

#[test]
fn test_argument_bounds() {
    let mut console = console(REGISTRY, ConsoleConfig::default());
    let before = PAIR_CALLS.load(Ordering::SeqCst);

    assert_eq!(
        console.execute(&["pair"]),
        Err(ConsoleError::TooFewArgs { required: 2, given: 1 })
    );
    assert!(take_output(&mut console).contains("Command pair requires at least 2 args, 1 given"));
    assert_eq!(PAIR_CALLS.load(Ordering::SeqCst), before);

    assert_eq!(
        console.execute(&["pair", "a", "b"]),
        Err(ConsoleError::TooManyArgs { maximum: 2, given: 3 })
    );
    assert!(take_output(&mut console).contains("Command pair takes a maximum of 2 args, 3 given"));
    assert_eq!(PAIR_CALLS.load(Ordering::SeqCst), before);

    assert_eq!(console.execute(&["pair", "a"]), Ok(()));
    assert_eq!(PAIR_CALLS.load(Ordering::SeqCst), before + 1);
}

#[test]
fn test_handler_return_code_not_propagated() {
    let mut console = console(REGISTRY, ConsoleConfig::default());

    assert_eq!(console.execute(&["failing"]), Ok(()));
    assert_eq!(FAILING_CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_first_duplicate_wins() {
    let mut console = console(REGISTRY, ConsoleConfig::default());

    assert_eq!(console.execute(&["dup"]), Ok(()));
    assert_eq!(FIRST_DUP_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(SECOND_DUP_CALLS.load(Ordering::SeqCst), 0);
}

#[test]
fn test_empty_argv_is_noop() {
    let mut console = console(REGISTRY, ConsoleConfig::default());

    assert_eq!(console.execute(&[]), Ok(()));
    assert!(take_output(&mut console).is_empty());
}

#[test]
fn test_typed_line_dispatches() {
    let mut console = console(REGISTRY, ConsoleConfig::default());

    console.write(b"help\r");
    let out = take_output(&mut console);
    assert!(out.contains("pair       - Needs exactly one argument"));
    assert!(out.ends_with("console> "));
}

#[test]
fn test_loglevel_command() {
    let mut console = console(REGISTRY, ConsoleConfig::default());

    assert_eq!(console.execute(&["loglevel"]), Ok(()));
    assert_eq!(take_output(&mut console), "loglevel=INFO\n");

    assert_eq!(console.execute(&["loglevel", "debug"]), Ok(()));
    assert_eq!(console.log_level(), esp_serial_console::LogLevel::Debug);

    assert_eq!(console.execute(&["loglevel", "loud"]), Ok(()));
    assert!(take_output(&mut console).contains("invalid level 'loud'"));
    assert_eq!(console.log_level(), esp_serial_console::LogLevel::Debug);
}

#[test]
fn test_error_display() {
    assert_eq!(ConsoleError::UnknownCommand.to_string(), "E01: unknown command");
    assert_eq!(
        ConsoleError::TooFewArgs { required: 2, given: 1 }.to_string(),
        "E02: too few arguments (2 required, 1 given)"
    );
    assert_eq!(ConsoleError::CompletionAllocationFailure.code(), "E04");
}

#[test]
fn test_registry_lookup() {
    static NOOP: &[CommandEntry] = &[CommandEntry::new("noop", "Nothing", cmd_noop)];
    static REG: CommandRegistry = CommandRegistry::new(NOOP);

    assert!(REG.find("noop").is_some());
    assert!(REG.find("help").is_some());
    assert!(REG.find("nope").is_none());
}
