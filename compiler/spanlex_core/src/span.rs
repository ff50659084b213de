//! Positional references into a source buffer.
//!
//! A [`Span`] records where a lexical unit lives (byte offset, byte length,
//! line, column) and nothing else. The text is recovered on demand with
//! [`Span::evaluate`], given the same buffer the span was derived from.

use std::fmt;
use std::str::Utf8Error;

/// Positional reference into a source buffer.
///
/// Layout: 16 bytes total
/// - offset: u32 - byte offset from buffer start (0-indexed)
/// - len: u32 - byte length
/// - line: u32 - line number (1-indexed)
/// - col: u32 - column in characters since the last `\n` (1-indexed)
///
/// A span does not borrow its buffer. Keeping the buffer alive and
/// evaluating against the right one is the caller's contract;
/// [`Tokenizer::evaluate`](crate::Tokenizer::evaluate) lets the compiler
/// check it instead.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub offset: u32,
    pub len: u32,
    pub line: u32,
    pub col: u32,
}

const _: () = assert!(std::mem::size_of::<Span>() == 16);

impl Span {
    /// Synthetic span with every field zero. See [`is_unknown`](Self::is_unknown).
    pub const DUMMY: Span = Span {
        offset: 0,
        len: 0,
        line: 0,
        col: 0,
    };

    /// Create a new span.
    #[inline]
    pub const fn new(offset: u32, len: u32, line: u32, col: u32) -> Self {
        Span {
            offset,
            len,
            line,
            col,
        }
    }

    /// Synthetic span, for values that did not come from a source buffer.
    #[inline]
    pub const fn unknown() -> Self {
        Self::DUMMY
    }

    /// `true` for the synthetic all-zero span.
    ///
    /// Line numbers start at 1, so no tokenizer-produced span is unknown.
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        self.offset == 0 && self.len == 0 && self.line == 0 && self.col == 0
    }

    /// Exclusive end offset.
    ///
    /// `offset + len` must fit in `u32`. Spans produced by a tokenizer always
    /// do; hand-built spans may not, and overflow in debug builds.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.offset + self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `(line, col)`.
    #[inline]
    pub const fn line_col(&self) -> (u32, u32) {
        (self.line, self.col)
    }

    /// Check if a byte offset is within this span.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.offset && offset < self.end()
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Line and column come from whichever span starts first. Only
    /// meaningful for adjacent or overlapping spans over the same buffer.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        debug_assert!(
            self.offset <= other.end() && other.offset <= self.end(),
            "merging disjoint spans {self:?} and {other:?}"
        );
        let first = if self.offset <= other.offset {
            self
        } else {
            other
        };
        let end = self.end().max(other.end());
        Span {
            offset: first.offset,
            len: end - first.offset,
            line: first.line,
            col: first.col,
        }
    }

    /// Convert to a `std::ops::Range` over the buffer.
    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.offset as usize..self.end() as usize
    }

    /// Recover the bytes this span refers to.
    ///
    /// # Panics
    ///
    /// Panics if the span does not fit inside `buf`. That can only happen
    /// when the span is evaluated against a buffer it was not derived from,
    /// which is a bug in the caller rather than bad input.
    #[inline]
    pub fn evaluate<'src>(&self, buf: &'src [u8]) -> &'src [u8] {
        match buf.get(self.to_range()) {
            Some(bytes) => bytes,
            None => panic!(
                "span {self:?} evaluated against a {} byte buffer it was not derived from",
                buf.len()
            ),
        }
    }

    /// Recover the text this span refers to.
    ///
    /// Fails only when the bytes are not UTF-8; out-of-bounds spans panic
    /// as in [`evaluate`](Self::evaluate).
    pub fn evaluate_str<'src>(&self, buf: &'src [u8]) -> Result<&'src str, Utf8Error> {
        std::str::from_utf8(self.evaluate(buf))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}@{}:{}", self.offset, self.len, self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
