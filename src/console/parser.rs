//! Command line tokenizer
//!
//! Splits on whitespace into a fixed argv array. No quoting.

/// Maximum tokens per line, command name included
pub const MAX_TOKENS: usize = 8;

/// Tokens of one command line
#[derive(Debug, Clone)]
pub struct ParsedLine<'a> {
    tokens: [&'a str; MAX_TOKENS],
    len: usize,
    /// More than MAX_TOKENS tokens were present
    overflow: bool,
}

impl<'a> ParsedLine<'a> {
    /// Create empty line
    pub const fn empty() -> Self {
        Self {
            tokens: [""; MAX_TOKENS],
            len: 0,
            overflow: false,
        }
    }

    /// argv view: `argv()[0]` is the command name
    pub fn argv(&self) -> &[&'a str] {
        &self.tokens[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    fn push(&mut self, token: &'a str) {
        if self.len < MAX_TOKENS {
            self.tokens[self.len] = token;
            self.len += 1;
        } else {
            self.overflow = true;
        }
    }
}

/// Parse a command line into argv tokens
pub fn parse_line(line: &str) -> ParsedLine<'_> {
    let mut parsed = ParsedLine::empty();
    for token in line.split_whitespace() {
        parsed.push(token);
    }
    parsed
}

/// Tokens for completion: a trailing space starts a new, empty token.
pub fn parse_for_completion(line: &str) -> ParsedLine<'_> {
    let mut parsed = parse_line(line);
    if !parsed.is_empty() && line.ends_with(|c: char| c.is_whitespace()) {
        parsed.push("");
    }
    parsed
}
