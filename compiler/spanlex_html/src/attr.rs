//! Attribute validation for the inside of a tag.
//!
//! The scanner hands over a cursor bounded to the bytes between the tag
//! name and the closing `>`. Validation accepts:
//!
//! ```text
//! ( ws+ name ( ws* '=' ws* '"' [^"]* '"' )? )* ws* '/'?
//! ```
//!
//! where `name` starts with `[A-Za-z_]` and continues with `[A-Za-z0-9_-]`.
//! A bare `name` is a boolean attribute. Close tags accept whitespace only.
//! Validation stops at the first failure.

use spanlex_core::class::{is_ident_continue, is_ident_start, is_whitespace};
use spanlex_core::{Cursor, Mark};

use crate::html_error::{AttributeError, HtmlError};
use crate::syntax_tree::ElementKind;

/// Continuation bytes of tag and attribute names.
#[inline]
pub(crate) fn is_name_continue(b: u8) -> bool {
    is_ident_continue(b) || b == b'-'
}

/// Validate the attribute region of a tag.
///
/// `cursor` must be bounded to the tag interior (see
/// [`Cursor::from_span`]); its EOF is the position of the closing `>`.
pub fn validate_attributes(mut cursor: Cursor<'_>, kind: ElementKind) -> Result<(), HtmlError> {
    loop {
        let separated = cursor.eat_while(is_whitespace) > 0;
        let Some(b) = cursor.current() else {
            return Ok(());
        };

        if b == b'/' && kind == ElementKind::Open && cursor.peek().is_none() {
            return Ok(());
        }

        let start = cursor.mark();
        if kind == ElementKind::Close {
            return Err(rest_of_tag(cursor, start, AttributeError::OnCloseTag));
        }
        if !is_ident_start(b) {
            return Err(single_byte(cursor, start, AttributeError::BadName));
        }
        if !separated {
            return Err(single_byte(cursor, start, AttributeError::MissingWhitespace));
        }

        attribute(&mut cursor, start)?;
    }
}

/// One `name` or `name="value"`, cursor on the first name byte.
fn attribute(cursor: &mut Cursor<'_>, start: Mark) -> Result<(), HtmlError> {
    cursor.advance();
    cursor.eat_while(is_name_continue);

    // Bare names are boolean attributes: rewind past any whitespace so the
    // next iteration sees it as the separator.
    let after_name = *cursor;
    cursor.eat_while(is_whitespace);
    if cursor.current() != Some(b'=') {
        *cursor = after_name;
        return Ok(());
    }
    cursor.advance();
    cursor.eat_while(is_whitespace);

    match cursor.current() {
        Some(b'"') => {
            cursor.advance();
            if !cursor.eat_until(b'"') {
                return Err(rest_of_tag(*cursor, start, AttributeError::UnterminatedValue));
            }
            cursor.advance();
            Ok(())
        }
        Some(_) => Err(single_byte(*cursor, start, AttributeError::MissingQuote)),
        None => Err(rest_of_tag(*cursor, start, AttributeError::MissingQuote)),
    }
}

/// Error spanning from `start` through the byte under the cursor.
fn single_byte(mut cursor: Cursor<'_>, start: Mark, reason: AttributeError) -> HtmlError {
    cursor.advance();
    HtmlError::invalid_attribute(cursor.span_from(start), reason)
}

/// Error spanning from `start` to the end of the tag interior.
fn rest_of_tag(mut cursor: Cursor<'_>, start: Mark, reason: AttributeError) -> HtmlError {
    cursor.advance_n(cursor.source_len() - cursor.pos());
    HtmlError::invalid_attribute(cursor.span_from(start), reason)
}
