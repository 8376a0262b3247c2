//! Command name completion
//!
//! Only the first token is completed. Results live in a reusable scratch
//! arena: the returned [`Candidates`] borrow it, so they are gone by the time
//! the next completion runs.

use core::ops::Range;

use alloc::string::String;
use alloc::vec::Vec;

use super::registry::CommandRegistry;
use super::ConsoleError;

/// Returned instead of any partial result when the scratch cannot grow.
pub const OUT_OF_MEMORY: &[&str] = &["completion:", "not", "enough", "memory"];

/// Completion candidates, in registry order.
///
/// With several matches the first candidate is only the part of the name
/// after the typed prefix; the others (and a sole match) are full names.
#[derive(Debug, Clone)]
pub enum Candidates<'a> {
    Scratch {
        text: &'a str,
        spans: &'a [Range<usize>],
    },
    /// No candidates
    Empty,
    /// Allocation failed; reads as [`OUT_OF_MEMORY`]
    OutOfMemory,
}

impl<'a> Candidates<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Scratch { spans, .. } => spans.len(),
            Self::Empty => 0,
            Self::OutOfMemory => OUT_OF_MEMORY.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<&'a str> {
        match *self {
            Self::Scratch { text, spans } => spans.get(idx).map(|r| &text[r.clone()]),
            Self::Empty => None,
            Self::OutOfMemory => OUT_OF_MEMORY.get(idx).copied(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory)
    }
}

/// Reusable completion arena. Grows on demand, never shrinks.
pub struct CompletionScratch {
    text: String,
    spans: Vec<Range<usize>>,
    /// Candidate slots the arena may hold (the device heap budget)
    max_candidates: usize,
}

impl CompletionScratch {
    pub const fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Arena refusing to grow past `max_candidates` slots.
    pub const fn with_limit(max_candidates: usize) -> Self {
        Self {
            text: String::new(),
            spans: Vec::new(),
            max_candidates,
        }
    }

    /// Candidate slots currently allocated
    pub fn capacity(&self) -> usize {
        self.spans.capacity()
    }

    /// Complete `argv[0]` against the registry.
    ///
    /// Any other token count yields no candidates. Allocation failure yields
    /// [`OUT_OF_MEMORY`] and leaves the previous results in the arena.
    pub fn complete(&mut self, registry: &CommandRegistry, argv: &[&str]) -> Candidates<'_> {
        let [part] = argv else {
            return Candidates::Empty;
        };
        let part: &str = part;

        let matching = registry.iter().filter(|c| c.name.starts_with(part));
        let ncompl = matching.clone().count();

        // Suffix for the first of several matches, full name otherwise
        let candidate = |i: usize, name: &'static str| -> &'static str {
            if i == 0 && ncompl > 1 {
                &name[part.len()..]
            } else {
                name
            }
        };

        let text_len = matching
            .clone()
            .enumerate()
            .map(|(i, c)| candidate(i, c.name).len())
            .sum();

        if self.reserve(ncompl, text_len).is_err() {
            return Candidates::OutOfMemory;
        }

        self.text.clear();
        self.spans.clear();
        for (i, c) in matching.enumerate() {
            let start = self.text.len();
            self.text.push_str(candidate(i, c.name));
            self.spans.push(start..self.text.len());
        }

        Candidates::Scratch {
            text: &self.text,
            spans: &self.spans,
        }
    }

    /// Make room for `ncompl` candidates totalling `text_len` bytes.
    fn reserve(&mut self, ncompl: usize, text_len: usize) -> Result<(), ConsoleError> {
        if ncompl > self.max_candidates {
            return Err(ConsoleError::CompletionAllocationFailure);
        }
        self.spans
            .try_reserve(ncompl.saturating_sub(self.spans.len()))
            .map_err(|_| ConsoleError::CompletionAllocationFailure)?;
        self.text
            .try_reserve(text_len.saturating_sub(self.text.len()))
            .map_err(|_| ConsoleError::CompletionAllocationFailure)?;
        Ok(())
    }
}

impl Default for CompletionScratch {
    fn default() -> Self {
        Self::new()
    }
}
