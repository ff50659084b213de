//! Lazy HTML scanner producing a flat [`SyntaxTree`] stream.
//!
//! At each position the scanner tries, in priority order:
//!
//! 1. `<!DOCTYPE` (ASCII case-insensitive) through the next `>`
//! 2. `<!--` through the next `-->`
//! 3. `<` or `</` followed by a tag name, through the first `>` that is not
//!    inside a double-quoted value
//! 4. Text: everything up to the next `<`
//!
//! A `<` that opens none of the first three is text. Malformed constructs
//! are recorded in [`HtmlTokenizer::errors`] and scanning continues:
//!
//! - An unterminated construct yields an error spanning from its `<` to the
//!   end of input, then resumes as text from that `<` up to the next `<`.
//! - A tag whose attributes fail validation is still emitted, with
//!   `validated: false`.
//!
//! Every input byte belongs to exactly one emitted tree, so the spans tile
//! the input.
//!
//! # Complexity
//!
//! The first failed search for `>`, `"`, or `-->` records the offset it
//! started from. No later search starting at or past that offset runs, so
//! a document full of unterminated constructs is still scanned in linear
//! time.

use std::iter::FusedIterator;

use spanlex_core::class::is_ident_start;
use spanlex_core::{Cursor, Span, Spanned};
use tracing::{debug, trace};

use crate::attr::{is_name_continue, validate_attributes};
use crate::html_error::HtmlError;
use crate::syntax_tree::{Element, ElementKind, SyntaxTree};

const DOCTYPE_OPEN: &[u8] = b"<!DOCTYPE";
const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";

/// What the scanner is about to read.
///
/// Between trees the scanner is in its dispatch state; [`HtmlTokenizer`]
/// picks one of these from the bytes at the cursor and runs it to
/// completion before returning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ScanState {
    InDoctype,
    InComment,
    InTag,
    InText,
}

/// Offset from which a delimiter is known not to occur.
#[derive(Copy, Clone, Debug, Default)]
struct Exhausted(Option<u32>);

impl Exhausted {
    #[inline]
    fn covers(self, pos: u32) -> bool {
        self.0.is_some_and(|from| pos >= from)
    }

    /// Run `search` on a copy of `cursor` and commit it only on success.
    ///
    /// A failed search leaves `cursor` untouched and marks everything from
    /// its start as exhausted.
    fn search<'src>(
        &mut self,
        cursor: &mut Cursor<'src>,
        search: impl FnOnce(&mut Cursor<'src>) -> bool,
    ) -> bool {
        let from = cursor.pos();
        if self.covers(from) {
            return false;
        }
        let mut probe = *cursor;
        if search(&mut probe) {
            *cursor = probe;
            true
        } else {
            self.0 = Some(from);
            false
        }
    }
}

/// Lazy HTML tokenizer.
///
/// Yields [`SyntaxTree`]s in source order. Errors are accumulated on the
/// side; read them with [`errors`](Self::errors) during or after iteration.
#[derive(Clone, Debug)]
pub struct HtmlTokenizer<'src> {
    cursor: Cursor<'src>,
    errors: Vec<HtmlError>,
    no_gt: Exhausted,
    no_quote: Exhausted,
    no_comment_close: Exhausted,
}

impl<'src> HtmlTokenizer<'src> {
    /// Create a tokenizer over `buf`.
    ///
    /// Offsets are `u32`: bytes past `u32::MAX` are never scanned. Check
    /// [`is_truncated`](Self::is_truncated) when buffers may be that large.
    pub fn new(buf: &'src [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
            errors: Vec::new(),
            no_gt: Exhausted::default(),
            no_quote: Exhausted::default(),
            no_comment_close: Exhausted::default(),
        }
    }

    /// `true` if `source()` is too long for `u32` offsets and its tail is
    /// not scanned.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.cursor.is_truncated()
    }

    /// The buffer being scanned.
    #[inline]
    pub fn source(&self) -> &'src [u8] {
        self.cursor.source()
    }

    /// Recover the bytes a tree (or any spanned value) refers to.
    #[inline]
    pub fn evaluate(&self, spanned: &impl Spanned) -> &'src [u8] {
        spanned.span().evaluate(self.source())
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[HtmlError] {
        &self.errors
    }

    /// Consume the tokenizer, returning its accumulated errors.
    pub fn into_errors(self) -> Vec<HtmlError> {
        self.errors
    }

    fn next_state(&self) -> Option<ScanState> {
        let b = self.cursor.current()?;
        if b != b'<' {
            return Some(ScanState::InText);
        }
        let state = if self.cursor.starts_with_ignore_ascii_case(DOCTYPE_OPEN) {
            ScanState::InDoctype
        } else if self.cursor.starts_with(COMMENT_OPEN) {
            ScanState::InComment
        } else if self.at_tag_start() {
            ScanState::InTag
        } else {
            ScanState::InText
        };
        Some(state)
    }

    /// `<name` or `</name`, cursor on the `<`.
    fn at_tag_start(&self) -> bool {
        match self.cursor.peek() {
            Some(b'/') => self.cursor.peek_n(2).is_some_and(is_ident_start),
            Some(b) => is_ident_start(b),
            None => false,
        }
    }

    /// Produce the next tree.
    pub fn next_tree(&mut self) -> Option<SyntaxTree> {
        let tree = match self.next_state()? {
            ScanState::InDoctype => self.scan_doctype(),
            ScanState::InComment => self.scan_comment(),
            ScanState::InTag => self.scan_tag(),
            ScanState::InText => self.scan_text(),
        };
        trace!(tree = ?tree, "scanned");
        Some(tree)
    }

    fn scan_doctype(&mut self) -> SyntaxTree {
        let start = self.cursor;
        self.cursor.advance_n(count(DOCTYPE_OPEN));
        if self.no_gt.search(&mut self.cursor, |c| c.eat_until(b'>')) {
            self.cursor.advance();
            SyntaxTree::Doctype(self.cursor.span_from(start.mark()))
        } else {
            self.unterminated(start, HtmlError::unterminated_doctype)
        }
    }

    fn scan_comment(&mut self) -> SyntaxTree {
        let start = self.cursor;
        self.cursor.advance_n(count(COMMENT_OPEN));
        if self
            .no_comment_close
            .search(&mut self.cursor, |c| c.eat_until_slice(COMMENT_CLOSE))
        {
            self.cursor.advance_n(count(COMMENT_CLOSE));
            SyntaxTree::Comment(self.cursor.span_from(start.mark()))
        } else {
            self.unterminated(start, HtmlError::unterminated_comment)
        }
    }

    fn scan_tag(&mut self) -> SyntaxTree {
        let start = self.cursor;
        self.cursor.advance();
        let kind = if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            ElementKind::Close
        } else {
            ElementKind::Open
        };

        let name_start = self.cursor.mark();
        self.cursor.advance();
        self.cursor.eat_while(is_name_continue);
        let tag = self.cursor.span_from(name_start);

        let interior_start = self.cursor.mark();
        let mut end = self.cursor;
        if !self.find_tag_end(&mut end) {
            // A quote left open hides every `>` from the quote-aware scan.
            // Fall back to the first raw `>`; validation then reports the
            // unterminated value.
            end = self.cursor;
            if !self.no_gt.search(&mut end, |c| c.eat_until(b'>')) {
                return self.unterminated(start, HtmlError::unterminated_tag);
            }
        }

        let interior = Cursor::from_span(self.source(), end.span_from(interior_start));
        end.advance();
        self.cursor = end;

        let validated = match validate_attributes(interior, kind) {
            Ok(()) => true,
            Err(error) => {
                self.record(error);
                false
            }
        };

        SyntaxTree::Element(Element {
            span: self.cursor.span_from(start.mark()),
            tag,
            kind,
            validated,
        })
    }

    fn scan_text(&mut self) -> SyntaxTree {
        let start = self.cursor.mark();
        // The first byte may be a `<` that opened nothing.
        self.cursor.advance();
        self.cursor.eat_until(b'<');
        SyntaxTree::Text(self.cursor.span_from(start))
    }

    /// Advance `end` to the first `>` outside a double-quoted value.
    ///
    /// Returns `false` if there is none, which includes a quote that never
    /// closes.
    fn find_tag_end(&mut self, end: &mut Cursor<'src>) -> bool {
        loop {
            let from = end.pos();
            if self.no_gt.covers(from) {
                return false;
            }
            let mut probe = *end;
            match probe.eat_until_either(b'>', b'"') {
                Some(b'>') => {
                    *end = probe;
                    return true;
                }
                Some(_) => {
                    probe.advance();
                    if !self.no_quote.search(&mut probe, |c| c.eat_until(b'"')) {
                        return false;
                    }
                    probe.advance();
                    *end = probe;
                }
                None => {
                    self.no_gt = Exhausted(Some(from));
                    return false;
                }
            }
        }
    }

    /// Record an unterminated construct and rescan it as text.
    ///
    /// `start` is the cursor on the construct's `<`; the error spans from
    /// there to the end of input.
    fn unterminated(&mut self, start: Cursor<'src>, error: fn(Span) -> HtmlError) -> SyntaxTree {
        let span = Span::new(
            start.pos(),
            start.source_len() - start.pos(),
            start.line(),
            start.col(),
        );
        self.record(error(span));
        self.cursor = start;
        self.scan_text()
    }

    fn record(&mut self, error: HtmlError) {
        debug!(%error, "malformed construct");
        self.errors.push(error);
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "delimiters are short literals"
)]
const fn count(delimiter: &[u8]) -> u32 {
    delimiter.len() as u32
}

impl Iterator for HtmlTokenizer<'_> {
    type Item = SyntaxTree;

    #[inline]
    fn next(&mut self) -> Option<SyntaxTree> {
        self.next_tree()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.remaining().len();
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for HtmlTokenizer<'_> {}

impl Spanned for HtmlTokenizer<'_> {
    /// Zero-length span at the scan position.
    fn span(&self) -> Span {
        self.cursor.span_from(self.cursor.mark())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
