//! Position-tracking cursor over a borrowed byte buffer.
//!
//! The cursor advances byte-by-byte and keeps line/column bookkeeping in
//! step with the byte offset, so any token boundary can be turned into a
//! [`Span`] without a second pass over the source.
//!
//! # Lines and Columns
//!
//! A `\n` byte increments the line and resets the column to 1, whatever
//! token it ends up in. Columns count characters: UTF-8 continuation bytes
//! (`0b10xx_xxxx`) do not advance the column. `\r` is an ordinary byte, so
//! `\r\n` counts as one line break.
//!
//! The column of a position is one plus the number of characters started
//! before it on its line. A continuation byte therefore reports the column
//! of the character that follows its lead byte: in `"éa"` the `0xA9` byte
//! and the `a` both sit at column 2. Consumers that split a multi-byte
//! character into separate tokens see those tokens share a column.
//!
//! # Buffer Size
//!
//! Offsets are `u32`. Buffers longer than `u32::MAX` bytes are only scanned
//! up to `u32::MAX`; the rest reads as EOF. [`Cursor::is_truncated`] reports
//! when that happened.

use crate::Span;

/// Snapshot of a cursor position, used to open a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark {
    pub offset: u32,
    pub line: u32,
    pub col: u32,
}

/// Cursor over a borrowed byte buffer.
///
/// The cursor is [`Copy`], enabling cheap state snapshots for backtracking
/// and lookahead.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'src> {
    buf: &'src [u8],
    /// Current read position (byte index into `buf`).
    pos: u32,
    line: u32,
    col: u32,
    /// Scannable length: `buf.len()` saturated to `u32::MAX`.
    source_len: u32,
}

/// Size assertion: Cursor should be <= 32 bytes on 64-bit platforms.
/// &[u8] = 16 (fat pointer), 4 x u32 = 16 => 32 bytes.
const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 32);

impl<'src> Cursor<'src> {
    /// Create a cursor at offset 0, line 1, column 1.
    pub fn new(buf: &'src [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            line: 1,
            col: 1,
            source_len: scannable_len(buf.len()),
        }
    }

    /// `true` if the buffer is longer than `u32::MAX` bytes and its tail is
    /// unreachable.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        u32::try_from(self.buf.len()).is_err()
    }

    /// Create a cursor over the bytes covered by `span`, starting with its
    /// line and column.
    ///
    /// Offsets stay absolute, so spans produced by this cursor evaluate
    /// against the whole `buf`. Used to re-scan part of a buffer (for
    /// example the inside of an element) with correct positions. A span
    /// reaching past the end of `buf` (or past `u32::MAX`) is clamped.
    pub fn from_span(buf: &'src [u8], span: Span) -> Self {
        let mut cursor = Self::new(buf);
        let end = span.offset.saturating_add(span.len);
        cursor.source_len = end.min(cursor.source_len);
        cursor.pos = span.offset.min(cursor.source_len);
        cursor.line = span.line;
        cursor.col = span.col;
        cursor
    }

    /// Returns the byte at the current position, or `None` at EOF.
    #[inline]
    pub fn current(&self) -> Option<u8> {
        self.peek_n(0)
    }

    /// Returns the byte one position ahead of current.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.peek_n(1)
    }

    /// Returns the byte `n` positions ahead of current.
    #[inline]
    pub fn peek_n(&self, n: u32) -> Option<u8> {
        let at = self.pos.checked_add(n)?;
        if at < self.source_len {
            Some(self.buf[at as usize])
        } else {
            None
        }
    }

    /// Returns `true` if the cursor has reached EOF.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Current line (1-indexed).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column (1-indexed, in characters).
    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Length of the scannable source.
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// The whole borrowed buffer.
    #[inline]
    pub fn source(&self) -> &'src [u8] {
        self.buf
    }

    /// The unconsumed rest of the buffer.
    #[inline]
    pub fn remaining(&self) -> &'src [u8] {
        &self.buf[self.pos as usize..self.source_len as usize]
    }

    /// Snapshot the current position.
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark {
            offset: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    /// Span covering everything consumed since `mark`.
    #[inline]
    pub fn span_from(&self, mark: Mark) -> Span {
        debug_assert!(mark.offset <= self.pos, "mark {mark:?} is ahead of cursor");
        Span::new(mark.offset, self.pos - mark.offset, mark.line, mark.col)
    }

    /// Advance the cursor by one byte. No-op at EOF.
    #[inline]
    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if !is_utf8_continuation(b) {
                self.col += 1;
            }
        }
    }

    /// Advance the cursor by up to `n` bytes, stopping at EOF.
    pub fn advance_n(&mut self, n: u32) {
        let n = n.min(self.source_len - self.pos);
        let skipped = &self.buf[self.pos as usize..(self.pos + n) as usize];
        match memchr::memrchr(b'\n', skipped) {
            Some(last) => {
                self.line += count_u32(memchr::memchr_iter(b'\n', skipped).count());
                self.col = 1 + count_chars(&skipped[last + 1..]);
            }
            None => self.col += count_chars(skipped),
        }
        self.pos += n;
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// Returns the number of bytes consumed.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> u32 {
        let start = self.pos;
        while let Some(b) = self.current() {
            if !pred(b) {
                break;
            }
            self.advance();
        }
        self.pos - start
    }

    /// Advance to the next occurrence of `byte` using SIMD-accelerated
    /// search.
    ///
    /// Returns `true` with the cursor on the found byte, or `false` with the
    /// cursor at EOF.
    pub fn eat_until(&mut self, byte: u8) -> bool {
        match memchr::memchr(byte, self.remaining()) {
            Some(offset) => {
                self.advance_n(count_u32(offset));
                true
            }
            None => {
                self.advance_n(self.source_len - self.pos);
                false
            }
        }
    }

    /// Advance to the next occurrence of either `a` or `b`.
    ///
    /// Returns the byte found with the cursor on it, or `None` with the
    /// cursor at EOF.
    pub fn eat_until_either(&mut self, a: u8, b: u8) -> Option<u8> {
        match memchr::memchr2(a, b, self.remaining()) {
            Some(offset) => {
                self.advance_n(count_u32(offset));
                self.current()
            }
            None => {
                self.advance_n(self.source_len - self.pos);
                None
            }
        }
    }

    /// Advance to the next occurrence of `needle`.
    ///
    /// Returns `true` with the cursor on the first byte of the match, or
    /// `false` with the cursor at EOF.
    pub fn eat_until_slice(&mut self, needle: &[u8]) -> bool {
        match memchr::memmem::find(self.remaining(), needle) {
            Some(offset) => {
                self.advance_n(count_u32(offset));
                true
            }
            None => {
                self.advance_n(self.source_len - self.pos);
                false
            }
        }
    }

    /// Check whether the unconsumed input starts with `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Check whether the unconsumed input starts with `prefix`, ignoring
    /// ASCII case.
    pub fn starts_with_ignore_ascii_case(&self, prefix: &[u8]) -> bool {
        let rest = self.remaining();
        rest.len() >= prefix.len() && rest[..prefix.len()].eq_ignore_ascii_case(prefix)
    }
}

/// Buffer length clamped to what `u32` offsets can address.
fn scannable_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// UTF-8 continuation bytes do not start a character.
#[inline]
fn is_utf8_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Number of characters (non-continuation bytes) in `bytes`.
fn count_chars(bytes: &[u8]) -> u32 {
    count_u32(bytes.iter().filter(|&&b| !is_utf8_continuation(b)).count())
}

/// Counts here never exceed the scannable length, which fits in `u32`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "counts are bounded by source_len which fits in u32"
)]
#[inline]
fn count_u32(n: usize) -> u32 {
    n as u32
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
