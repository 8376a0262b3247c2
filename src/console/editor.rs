//! Minimal line editor: echo, backspace, history, tab and Ctrl+C.
//!
//! The editor only edits. Submitting, completing and interrupting are
//! reported to the console as [`EditorAction`]s.

use core::fmt::Write;

/// Maximum line length
pub const LINE_SIZE: usize = 80;

/// Number of history entries
pub const HISTORY_SIZE: usize = 4;

const KEY_ETX: u8 = 0x03;
const KEY_BS: u8 = 0x08;
const KEY_TAB: u8 = b'\t';
const KEY_NAK: u8 = 0x15;
const KEY_ESC: u8 = 0x1B;
const KEY_DEL: u8 = 0x7F;

/// Line input buffer (printable ASCII only)
#[derive(Clone, Copy)]
pub struct LineBuffer {
    buf: [u8; LINE_SIZE],
    len: usize,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_SIZE],
            len: 0,
        }
    }

    /// Append a byte. Returns `false` when the line is full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < LINE_SIZE {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Remove last character
    pub fn backspace(&mut self) -> bool {
        if self.len > 0 {
            self.len -= 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Replace contents, truncating to LINE_SIZE
    pub fn set(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let copy_len = bytes.len().min(LINE_SIZE);
        self.buf[..copy_len].copy_from_slice(&bytes[..copy_len]);
        self.len = copy_len;
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Command history ring buffer
pub struct History {
    entries: [LineBuffer; HISTORY_SIZE],
    /// Next slot to write
    write_idx: usize,
    count: usize,
    /// Navigation position, 0 = newest
    nav_pos: Option<usize>,
}

impl History {
    pub const fn new() -> Self {
        Self {
            entries: [LineBuffer::new(); HISTORY_SIZE],
            write_idx: 0,
            count: 0,
            nav_pos: None,
        }
    }

    /// Record a submitted line. Repeating the newest entry is not recorded twice.
    pub fn push(&mut self, line: &str) {
        self.nav_pos = None;
        if self.get_at(0) == Some(line) {
            return;
        }
        self.entries[self.write_idx].set(line);
        self.write_idx = (self.write_idx + 1) % HISTORY_SIZE;
        self.count = (self.count + 1).min(HISTORY_SIZE);
    }

    /// Step to an older entry
    pub fn get_prev(&mut self) -> Option<&str> {
        if self.count == 0 {
            return None;
        }
        let pos = match self.nav_pos {
            None => 0,
            Some(p) => (p + 1).min(self.count - 1),
        };
        self.nav_pos = Some(pos);
        self.get_at(pos)
    }

    /// Step to a newer entry; `None` means back to an empty line
    pub fn get_next(&mut self) -> Option<&str> {
        match self.nav_pos {
            None | Some(0) => {
                self.nav_pos = None;
                None
            }
            Some(p) => {
                self.nav_pos = Some(p - 1);
                self.get_at(p - 1)
            }
        }
    }

    pub fn reset_nav(&mut self) {
        self.nav_pos = None;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn get_at(&self, nav_pos: usize) -> Option<&str> {
        if nav_pos >= self.count {
            return None;
        }
        let idx = (self.write_idx + HISTORY_SIZE - 1 - nav_pos) % HISTORY_SIZE;
        Some(self.entries[idx].as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// What the console should do after a byte was edited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    /// Enter on a line: run it, then redraw the prompt
    Submit,
    /// Enter on an empty line: redraw the prompt
    EmptyLine,
    /// Tab pressed
    Complete,
    /// Ctrl+C pressed; the line has been discarded
    Interrupt,
}

#[derive(Clone, Copy, PartialEq)]
enum InputState {
    Normal,
    Escape,  // Got ESC
    Bracket, // Got ESC [
}

/// Line editor state
pub struct LineEditor {
    line: LineBuffer,
    history: History,
    input: InputState,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
            history: History::new(),
            input: InputState::Normal,
        }
    }

    /// Current line contents
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Discard the current line without echo.
    pub fn clear(&mut self) {
        self.line.clear();
        self.input = InputState::Normal;
    }

    /// Edit in one byte, echoing to `out`.
    pub fn insert_char(&mut self, byte: u8, out: &mut dyn Write) -> EditorAction {
        match self.input {
            InputState::Normal => self.insert_normal(byte, out),
            InputState::Escape => {
                self.input = if byte == b'[' {
                    InputState::Bracket
                } else {
                    InputState::Normal
                };
                EditorAction::None
            }
            InputState::Bracket => {
                self.input = InputState::Normal;
                match byte {
                    b'A' => self.history_prev(out),
                    b'B' => self.history_next(out),
                    _ => {}
                }
                EditorAction::None
            }
        }
    }

    fn insert_normal(&mut self, byte: u8, out: &mut dyn Write) -> EditorAction {
        match byte {
            b'\r' | b'\n' => {
                let _ = writeln!(out);
                if self.line.as_str().trim().is_empty() {
                    self.line.clear();
                    return EditorAction::EmptyLine;
                }
                self.history.push(self.line.as_str());
                EditorAction::Submit
            }

            KEY_DEL | KEY_BS => {
                if self.line.backspace() {
                    let _ = write!(out, "\x08 \x08");
                }
                self.history.reset_nav();
                EditorAction::None
            }

            KEY_TAB => EditorAction::Complete,

            KEY_ESC => {
                self.input = InputState::Escape;
                EditorAction::None
            }

            KEY_ETX => {
                let _ = writeln!(out, "^C");
                self.line.clear();
                self.history.reset_nav();
                EditorAction::Interrupt
            }

            KEY_NAK => {
                self.erase_displayed(out);
                self.line.clear();
                EditorAction::None
            }

            0x20..=0x7E => {
                if self.line.push(byte) {
                    let _ = out.write_char(byte as char);
                }
                self.history.reset_nav();
                EditorAction::None
            }

            _ => EditorAction::None,
        }
    }

    /// Append text at the end of the line, echoing it.
    pub fn insert_str(&mut self, s: &str, out: &mut dyn Write) {
        for b in s.bytes() {
            if !self.line.push(b) {
                break;
            }
            let _ = out.write_char(b as char);
        }
    }

    /// Print the current line (after a prompt redraw).
    pub fn redraw(&self, out: &mut dyn Write) {
        let _ = out.write_str(self.line.as_str());
    }

    fn history_prev(&mut self, out: &mut dyn Write) {
        let mut tmp = LineBuffer::new();
        match self.history.get_prev() {
            Some(prev) => tmp.set(prev),
            None => return,
        }
        self.replace_line(tmp.as_str(), out);
    }

    fn history_next(&mut self, out: &mut dyn Write) {
        let mut tmp = LineBuffer::new();
        if let Some(next) = self.history.get_next() {
            tmp.set(next);
        }
        self.replace_line(tmp.as_str(), out);
    }

    fn replace_line(&mut self, new_line: &str, out: &mut dyn Write) {
        self.erase_displayed(out);
        self.line.set(new_line);
        let _ = out.write_str(self.line.as_str());
    }

    fn erase_displayed(&self, out: &mut dyn Write) {
        for _ in 0..self.line.len() {
            let _ = out.write_str("\x08 \x08");
        }
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(editor: &mut LineEditor, bytes: &[u8], out: &mut String) -> EditorAction {
        let mut last = EditorAction::None;
        for &b in bytes {
            last = editor.insert_char(b, &mut *out);
        }
        last
    }

    #[test]
    fn test_line_buffer_overflow() {
        let mut buf = LineBuffer::new();
        for i in 0..100u8 {
            buf.push(b'a' + (i % 26));
        }
        assert_eq!(buf.len(), LINE_SIZE);
    }

    #[test]
    fn test_typing_echoes_and_submits() {
        let mut editor = LineEditor::new();
        let mut out = String::new();

        assert_eq!(feed(&mut editor, b"help", &mut out), EditorAction::None);
        assert_eq!(out, "help");
        assert_eq!(feed(&mut editor, b"\r", &mut out), EditorAction::Submit);
        assert_eq!(editor.line().as_str(), "help");
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_blank_line_is_not_submitted() {
        let mut editor = LineEditor::new();
        let mut out = String::new();

        assert_eq!(feed(&mut editor, b"   \n", &mut out), EditorAction::EmptyLine);
        assert!(editor.line().is_empty());
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_backspace_and_ctrl_u() {
        let mut editor = LineEditor::new();
        let mut out = String::new();

        feed(&mut editor, b"helpx\x7f", &mut out);
        assert_eq!(editor.line().as_str(), "help");
        feed(&mut editor, &[KEY_NAK], &mut out);
        assert!(editor.line().is_empty());
    }

    #[test]
    fn test_ctrl_c_discards_line() {
        let mut editor = LineEditor::new();
        let mut out = String::new();

        assert_eq!(feed(&mut editor, b"stat\x03", &mut out), EditorAction::Interrupt);
        assert!(editor.line().is_empty());
        assert!(out.ends_with("^C\n"));
    }

    #[test]
    fn test_history_arrows() {
        let mut editor = LineEditor::new();
        let mut out = String::new();

        feed(&mut editor, b"first\r", &mut out);
        editor.clear();
        feed(&mut editor, b"second\r", &mut out);
        editor.clear();

        feed(&mut editor, b"\x1b[A", &mut out);
        assert_eq!(editor.line().as_str(), "second");
        feed(&mut editor, b"\x1b[A", &mut out);
        assert_eq!(editor.line().as_str(), "first");
        feed(&mut editor, b"\x1b[A", &mut out);
        assert_eq!(editor.line().as_str(), "first");
        feed(&mut editor, b"\x1b[B", &mut out);
        assert_eq!(editor.line().as_str(), "second");
        feed(&mut editor, b"\x1b[B", &mut out);
        assert!(editor.line().is_empty());
    }

    #[test]
    fn test_history_ring_wraps() {
        let mut history = History::new();
        for line in ["a", "b", "c", "d", "e"] {
            history.push(line);
        }
        assert_eq!(history.len(), HISTORY_SIZE);
        assert_eq!(history.get_prev(), Some("e"));
        assert_eq!(history.get_prev(), Some("d"));
        assert_eq!(history.get_prev(), Some("c"));
        assert_eq!(history.get_prev(), Some("b"));
        assert_eq!(history.get_prev(), Some("b"));
    }

    #[test]
    fn test_history_skips_repeat() {
        let mut history = History::new();
        history.push("help");
        history.push("help");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_tab_reports_complete() {
        let mut editor = LineEditor::new();
        let mut out = String::new();
        assert_eq!(feed(&mut editor, b"he\t", &mut out), EditorAction::Complete);
        assert_eq!(editor.line().as_str(), "he");
    }
}
