//! Errors for malformed HTML constructs.
//!
//! Errors are per construct and never abort the scan: the tokenizer records
//! them and keeps producing trees. Each error carries the span of the
//! offending construct (WHERE) and its kind (WHAT).

use spanlex_core::Span;
use thiserror::Error;

/// A malformed construct found while tokenizing HTML.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq, Hash)]
#[error("[{span}] {kind}")]
pub struct HtmlError {
    /// WHERE the construct is. For unterminated constructs this runs from
    /// the opening `<` to the end of input.
    pub span: Span,
    /// WHAT went wrong.
    pub kind: HtmlErrorKind,
}

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum HtmlErrorKind {
    /// `<!--` with no following `-->`.
    #[error("unterminated comment: `<!--` has no closing `-->`")]
    UnterminatedComment,
    /// `<!DOCTYPE` with no following `>`.
    #[error("unterminated doctype: `<!DOCTYPE` has no closing `>`")]
    UnterminatedDoctype,
    /// A tag opened by `<` with no following unescaped `>`.
    #[error("unterminated tag: `<` has no closing `>`")]
    UnterminatedTag,
    /// Malformed attribute syntax inside a tag.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(AttributeError),
}

/// Why attribute validation failed.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum AttributeError {
    /// Attribute name does not start with `[A-Za-z_]`.
    #[error("expected an attribute name")]
    BadName,
    /// Value after `=` is not a double-quoted string.
    #[error("attribute value must be a double-quoted string")]
    MissingQuote,
    /// Double-quoted value with no closing `"` inside the tag.
    #[error("attribute value has no closing `\"`")]
    UnterminatedValue,
    /// Two attributes, or the tag name and an attribute, run together.
    #[error("attributes must be separated by whitespace")]
    MissingWhitespace,
    /// Anything but whitespace after the name of a close tag.
    #[error("close tags cannot have attributes")]
    OnCloseTag,
}

impl HtmlError {
    pub fn new(span: Span, kind: HtmlErrorKind) -> Self {
        Self { span, kind }
    }

    pub fn unterminated_comment(span: Span) -> Self {
        Self::new(span, HtmlErrorKind::UnterminatedComment)
    }

    pub fn unterminated_doctype(span: Span) -> Self {
        Self::new(span, HtmlErrorKind::UnterminatedDoctype)
    }

    pub fn unterminated_tag(span: Span) -> Self {
        Self::new(span, HtmlErrorKind::UnterminatedTag)
    }

    pub fn invalid_attribute(span: Span, reason: AttributeError) -> Self {
        Self::new(span, HtmlErrorKind::InvalidAttribute(reason))
    }

    /// `true` for errors that turned a construct back into text.
    pub fn is_unterminated(&self) -> bool {
        matches!(
            self.kind,
            HtmlErrorKind::UnterminatedComment
                | HtmlErrorKind::UnterminatedDoctype
                | HtmlErrorKind::UnterminatedTag
        )
    }
}
