//! Token descriptors produced by the base tokenizer.

use crate::Span;

/// A single classified unit of source.
///
/// Tokens describe where text lives, never the text itself. Use
/// [`Spanned::evaluate`] with the originating buffer to recover it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenTree {
    /// Maximal run of `[A-Za-z0-9_]` starting with `[A-Za-z_]`.
    Ident(Span),
    /// Exactly one byte that is neither identifier nor whitespace.
    Punct(Span),
    /// Maximal run of ASCII whitespace.
    Whitespace(Span),
}

/// Discriminant of a [`TokenTree`], for matching without the span.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Punct,
    Whitespace,
}

impl TokenTree {
    #[inline]
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenTree::Ident(_) => TokenKind::Ident,
            TokenTree::Punct(_) => TokenKind::Punct,
            TokenTree::Whitespace(_) => TokenKind::Whitespace,
        }
    }

    /// Returns `true` if this is a punctuation token for `byte`.
    ///
    /// Needs the buffer because the token does not carry its text.
    #[inline]
    pub fn is_punct(&self, byte: u8, buf: &[u8]) -> bool {
        matches!(self, TokenTree::Punct(span) if span.evaluate(buf) == [byte])
    }
}

/// Anything that knows where it lives in a source buffer.
pub trait Spanned {
    /// This value's span.
    fn span(&self) -> Span;

    /// Recover the bytes this value covers in `buf`.
    ///
    /// `buf` must be the buffer the value was derived from; see
    /// [`Span::evaluate`] for the panic contract.
    fn evaluate<'src>(&self, buf: &'src [u8]) -> &'src [u8] {
        self.span().evaluate(buf)
    }
}

impl Spanned for Span {
    #[inline]
    fn span(&self) -> Span {
        *self
    }
}

impl Spanned for TokenTree {
    #[inline]
    fn span(&self) -> Span {
        match self {
            TokenTree::Ident(span) | TokenTree::Punct(span) | TokenTree::Whitespace(span) => *span,
        }
    }
}
