//! The base tokenizer: bytes in, [`TokenTree`] descriptors out.
//!
//! # Design
//!
//! A single left-to-right scan. At each position the current byte is
//! classified ([`classify`]) and the matching run is consumed:
//!
//! - identifier start: consume the maximal `[A-Za-z0-9_]` run
//! - whitespace: consume the maximal whitespace run
//! - anything else (digits not inside an identifier included): exactly one
//!   byte of punctuation
//!
//! Every byte belongs to exactly one class, so the scan cannot fail and the
//! emitted spans tile the input. Tokens are produced lazily, one per
//! [`Iterator::next`] call; a consumer that stops early pays nothing for
//! the rest of the buffer.

use std::iter::FusedIterator;

use crate::class::{classify, is_ident_continue, is_whitespace, ByteClass};
use crate::cursor::Cursor;
use crate::token_tree::{Spanned, TokenTree};
use crate::Span;

/// Tokenize a whole buffer into a `Vec`.
///
/// For streaming access, iterate a [`Tokenizer`] directly.
pub fn tokenize(buf: &[u8]) -> Vec<TokenTree> {
    Tokenizer::new(buf).collect()
}

/// Lazy iterator of [`TokenTree`] over a borrowed buffer.
///
/// Infallible and fused: once it returns `None` it keeps returning `None`.
#[derive(Clone, Debug)]
pub struct Tokenizer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Tokenizer<'src> {
    /// Create a tokenizer over the whole of `buf`.
    ///
    /// Offsets are `u32`: bytes past `u32::MAX` are never tokenized. Check
    /// [`is_truncated`](Self::is_truncated) when buffers may be that large.
    pub fn new(buf: &'src [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
        }
    }

    /// Create a tokenizer over the bytes covered by `span`.
    ///
    /// Produced spans are absolute offsets into `buf` and continue from the
    /// span's line and column.
    pub fn from_span(buf: &'src [u8], span: Span) -> Self {
        Self {
            cursor: Cursor::from_span(buf, span),
        }
    }

    /// The buffer being tokenized.
    #[inline]
    pub fn source(&self) -> &'src [u8] {
        self.cursor.source()
    }

    /// `true` if `source()` is too long for `u32` offsets and its tail is
    /// not tokenized.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.cursor.is_truncated()
    }

    /// Recover the bytes of a token produced by this tokenizer.
    ///
    /// Unlike [`Spanned::evaluate`], the buffer is the one this tokenizer
    /// borrows, so the result cannot outlive it.
    #[inline]
    pub fn evaluate(&self, spanned: &impl Spanned) -> &'src [u8] {
        spanned.span().evaluate(self.cursor.source())
    }

    /// Wrap this tokenizer in an `N`-token lookahead adapter.
    pub fn peekable_tokens<const N: usize>(self) -> Peekable<'src, N> {
        Peekable::new(self)
    }

    /// Produce the next token, or `None` at end of input.
    #[inline]
    pub fn next_token(&mut self) -> Option<TokenTree> {
        let mark = self.cursor.mark();
        let byte = self.cursor.current()?;
        let tree = match classify(byte) {
            ByteClass::IdentStart => {
                self.cursor.advance();
                self.cursor.eat_while(is_ident_continue);
                TokenTree::Ident(self.cursor.span_from(mark))
            }
            ByteClass::Whitespace => {
                self.cursor.eat_while(is_whitespace);
                TokenTree::Whitespace(self.cursor.span_from(mark))
            }
            // A digit only joins an identifier that is already open.
            ByteClass::Digit | ByteClass::Punct => {
                self.cursor.advance();
                TokenTree::Punct(self.cursor.span_from(mark))
            }
        };
        Some(tree)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = TokenTree;

    #[inline]
    fn next(&mut self) -> Option<TokenTree> {
        self.next_token()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.remaining().len();
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Zero-length span at the tokenizer's current position.
impl Spanned for Tokenizer<'_> {
    fn span(&self) -> Span {
        self.cursor.span_from(self.cursor.mark())
    }
}

/// Fixed-capacity lookahead over a [`Tokenizer`].
///
/// Holds up to `N` peeked tokens inline; peeking never allocates.
#[derive(Clone, Debug)]
pub struct Peekable<'src, const N: usize = 3> {
    iter: Tokenizer<'src>,
    peeked: [Option<TokenTree>; N],
}

impl<'src, const N: usize> Peekable<'src, N> {
    fn new(iter: Tokenizer<'src>) -> Self {
        Self {
            iter,
            peeked: [None; N],
        }
    }

    /// Peek `n` tokens ahead, 0-indexed: `peek_n(0)` is the next token.
    ///
    /// # Panics
    ///
    /// Panics if `n >= N`.
    pub fn peek_n(&mut self, n: usize) -> Option<&TokenTree> {
        assert!(n < N, "peek_n({n}) exceeds lookahead capacity {N}");
        for slot in 0..=n {
            if self.peeked[slot].is_none() {
                self.peeked[slot] = Some(self.iter.next()?);
            }
        }
        self.peeked[n].as_ref()
    }

    pub fn peek(&mut self) -> Option<&TokenTree> {
        self.peek_n(0)
    }

    pub fn peek2(&mut self) -> Option<&TokenTree> {
        self.peek_n(1)
    }

    pub fn peek3(&mut self) -> Option<&TokenTree> {
        self.peek_n(2)
    }

    /// The buffer being tokenized.
    pub fn source(&self) -> &'src [u8] {
        self.iter.source()
    }
}

impl<const N: usize> Iterator for Peekable<'_, N> {
    type Item = TokenTree;

    fn next(&mut self) -> Option<TokenTree> {
        match self.peeked.first_mut().and_then(Option::take) {
            Some(tree) => {
                // Slot 0 is now empty; rotate it to the back.
                self.peeked.rotate_left(1);
                Some(tree)
            }
            None => self.iter.next(),
        }
    }
}

impl<const N: usize> FusedIterator for Peekable<'_, N> {}

/// Span of the next token if one is peeked, else the tokenizer position.
impl<const N: usize> Spanned for Peekable<'_, N> {
    fn span(&self) -> Span {
        match self.peeked.first() {
            Some(Some(tree)) => tree.span(),
            _ => self.iter.span(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
