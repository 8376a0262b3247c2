//! Console error types

/// Console error with code and message
///
/// None of these are fatal: the operator retries with corrected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: No command with that name
    UnknownCommand,
    /// E02: Fewer arguments than the command requires
    TooFewArgs { required: usize, given: usize },
    /// E03: More arguments than the command accepts
    TooManyArgs { maximum: usize, given: usize },
    /// E04: Completion scratch could not grow
    CompletionAllocationFailure,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::TooFewArgs { .. } => "E02",
            Self::TooManyArgs { .. } => "E03",
            Self::CompletionAllocationFailure => "E04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::TooFewArgs { .. } => "too few arguments",
            Self::TooManyArgs { .. } => "too many arguments",
            Self::CompletionAllocationFailure => "completion out of memory",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())?;
        match self {
            Self::TooFewArgs { required, given } => write!(f, " ({} required, {} given)", required, given),
            Self::TooManyArgs { maximum, given } => write!(f, " ({} maximum, {} given)", maximum, given),
            _ => Ok(()),
        }
    }
}
