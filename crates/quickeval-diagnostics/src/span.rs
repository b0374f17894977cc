//! Byte spans inside a single-line query

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A span in the query text, represented as a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width span at a position
    #[inline]
    pub const fn point(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Merge two spans into one that covers both
    #[inline]
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Render a caret line (`   ^^^`) pointing at this span under `source`.
    ///
    /// Offsets are converted to character columns so multi-byte units such as
    /// `²` or `°` line up.
    pub fn underline(&self, source: &str) -> String {
        let column = source
            .char_indices()
            .take_while(|(i, _)| *i < self.start)
            .count();
        let width = source
            .char_indices()
            .filter(|(i, _)| *i >= self.start && *i < self.end)
            .count()
            .max(1);
        format!("{}{}", " ".repeat(column), "^".repeat(width))
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
