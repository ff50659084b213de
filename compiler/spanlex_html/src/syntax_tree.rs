//! Structural units of the flat HTML token stream.

use spanlex_core::{Span, Spanned};

/// One structural unit of HTML.
///
/// The stream is flat: an `Element` is a tag boundary, not a subtree. The
/// children of `<div>` are the entries that follow it, up to the matching
/// close tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxTree {
    /// `<!DOCTYPE html>`, delimiters included.
    Doctype(Span),
    /// `<!-- comment -->`, delimiters included.
    Comment(Span),
    /// `<div class="x">` or `</div>`.
    Element(Element),
    /// Any run of bytes outside the constructs above.
    Text(Span),
}

/// An open or close tag.
///
/// Attribute text is covered by `span` but not decomposed. Re-scan it with
/// [`Tokenizer::from_span`](spanlex_core::Tokenizer::from_span) if needed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Element {
    /// The whole tag, `<` through `>`.
    pub span: Span,
    /// The tag name.
    pub tag: Span,
    pub kind: ElementKind,
    /// Whether the attribute syntax inside the tag passed validation.
    pub validated: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
}

impl Element {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.kind == ElementKind::Open
    }

    #[inline]
    pub fn is_close(&self) -> bool {
        self.kind == ElementKind::Close
    }
}

impl SyntaxTree {
    /// The element, if this is a tag.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            SyntaxTree::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl Spanned for Element {
    #[inline]
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for SyntaxTree {
    fn span(&self) -> Span {
        match self {
            SyntaxTree::Doctype(span) | SyntaxTree::Comment(span) | SyntaxTree::Text(span) => *span,
            SyntaxTree::Element(element) => element.span,
        }
    }
}
