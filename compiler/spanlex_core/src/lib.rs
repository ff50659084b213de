//! Zero-copy byte tokenizer.
//!
//! Converts a source buffer into an ordered, lazily produced sequence of
//! [`TokenTree`] descriptors. A token records *where* a lexical unit lives
//! ([`Span`]: offset, length, line, column), never a copy of its text.
//!
//! ```text
//! &[u8] → Tokenizer → TokenTree { Ident | Punct | Whitespace } → consumer
//!                                     │
//!                  Span::evaluate(buf) ┘ → &[u8]
//! ```
//!
//! Tokenizing is infallible: byte classification ([`class`]) partitions the
//! byte alphabet, so every byte lands in exactly one token and the spans of
//! consecutive tokens tile the input.
//!
//! Specialized tokenizers (such as `spanlex_html`) are built by composing
//! [`Cursor`] and the [`class`] predicates with their own grouping rules,
//! not by configuring this one.

pub mod class;
mod cursor;
mod span;
mod token_tree;
mod tokenizer;

pub use class::ByteClass;
pub use cursor::{Cursor, Mark};
pub use span::Span;
pub use token_tree::{Spanned, TokenKind, TokenTree};
pub use tokenizer::{tokenize, Peekable, Tokenizer};

/// Recover the bytes `span` refers to in `buf`.
///
/// Equivalent to [`Span::evaluate`]; panics if `span` was not derived from
/// `buf`.
#[inline]
pub fn evaluate<'src>(span: Span, buf: &'src [u8]) -> &'src [u8] {
    span.evaluate(buf)
}
