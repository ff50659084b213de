use super::*;
use std::time::{Duration, Instant};

use crate::html_error::{AttributeError, HtmlErrorKind};
use pretty_assertions::assert_eq;

fn scan(src: &str) -> (Vec<SyntaxTree>, Vec<HtmlError>) {
    let mut tokenizer = HtmlTokenizer::new(src.as_bytes());
    let trees: Vec<_> = tokenizer.by_ref().collect();
    (trees, tokenizer.into_errors())
}

fn element(span: Span, tag: Span, kind: ElementKind, validated: bool) -> SyntaxTree {
    SyntaxTree::Element(Element {
        span,
        tag,
        kind,
        validated,
    })
}

// === Well-formed input ===

#[test]
fn empty_input() {
    assert_eq!(scan(""), (vec![], vec![]));
}

#[test]
fn element_text_element() {
    let (trees, errors) = scan("<div>text</div>");
    assert_eq!(
        trees,
        vec![
            element(
                Span::new(0, 5, 1, 1),
                Span::new(1, 3, 1, 2),
                ElementKind::Open,
                true
            ),
            SyntaxTree::Text(Span::new(5, 4, 1, 6)),
            element(
                Span::new(9, 6, 1, 10),
                Span::new(11, 3, 1, 12),
                ElementKind::Close,
                true
            ),
        ]
    );
    assert_eq!(errors, vec![]);
}

#[test]
fn quoted_attribute_is_valid() {
    let (trees, errors) = scan(r#"<a href="x">"#);
    assert_eq!(
        trees,
        vec![element(
            Span::new(0, 12, 1, 1),
            Span::new(1, 1, 1, 2),
            ElementKind::Open,
            true
        )]
    );
    assert_eq!(errors, vec![]);
}

#[test]
fn gt_inside_quoted_value() {
    let (trees, errors) = scan(r#"<div class="a>b">"#);
    assert_eq!(
        trees,
        vec![element(
            Span::new(0, 17, 1, 1),
            Span::new(1, 3, 1, 2),
            ElementKind::Open,
            true
        )]
    );
    assert_eq!(errors, vec![]);
}

#[test]
fn self_closing_tag() {
    let (trees, errors) = scan("<br/>");
    assert_eq!(
        trees,
        vec![element(
            Span::new(0, 5, 1, 1),
            Span::new(1, 2, 1, 2),
            ElementKind::Open,
            true
        )]
    );
    assert_eq!(errors, vec![]);
}

#[test]
fn hyphenated_tag_name() {
    let src = "<my-widget>";
    let mut tokenizer = HtmlTokenizer::new(src.as_bytes());
    let tree = tokenizer.next().unwrap();
    let element = tree.as_element().unwrap();
    assert_eq!(tokenizer.evaluate(&element.tag), b"my-widget");
}

#[test]
fn doctype() {
    let (trees, errors) = scan("<!DOCTYPE html>");
    assert_eq!(trees, vec![SyntaxTree::Doctype(Span::new(0, 15, 1, 1))]);
    assert_eq!(errors, vec![]);
}

#[test]
fn doctype_is_case_insensitive() {
    let (trees, _) = scan("<!doctype html>");
    assert_eq!(trees, vec![SyntaxTree::Doctype(Span::new(0, 15, 1, 1))]);
}

#[test]
fn comment_hides_markup() {
    let (trees, errors) = scan("<!-- <p> > -->");
    assert_eq!(trees, vec![SyntaxTree::Comment(Span::new(0, 14, 1, 1))]);
    assert_eq!(errors, vec![]);
}

#[test]
fn document_positions() {
    let src = "<!DOCTYPE html>\n<p>\n  hi\n</p>";
    let (trees, errors) = scan(src);
    assert_eq!(
        trees,
        vec![
            SyntaxTree::Doctype(Span::new(0, 15, 1, 1)),
            SyntaxTree::Text(Span::new(15, 1, 1, 16)),
            element(
                Span::new(16, 3, 2, 1),
                Span::new(17, 1, 2, 2),
                ElementKind::Open,
                true
            ),
            SyntaxTree::Text(Span::new(19, 6, 2, 4)),
            element(
                Span::new(25, 4, 4, 1),
                Span::new(27, 1, 4, 3),
                ElementKind::Close,
                true
            ),
        ]
    );
    assert_eq!(errors, vec![]);
}

// === Stray `<` ===

#[test]
fn stray_lt_is_text() {
    let (trees, errors) = scan("a < b");
    assert_eq!(
        trees,
        vec![
            SyntaxTree::Text(Span::new(0, 2, 1, 1)),
            SyntaxTree::Text(Span::new(2, 3, 1, 3)),
        ]
    );
    assert_eq!(errors, vec![]);
}

#[test]
fn lt_without_name_is_text() {
    for src in ["<", "<1>", "</>", "<!x>", "< p>"] {
        let (trees, errors) = scan(src);
        let len = u32::try_from(src.len()).unwrap();
        assert_eq!(
            trees,
            vec![SyntaxTree::Text(Span::new(0, len, 1, 1))],
            "{src:?}"
        );
        assert_eq!(errors, vec![], "{src:?}");
    }
}

// === Unterminated constructs ===

#[test]
fn unterminated_comment() {
    let (trees, errors) = scan("<!-- oops");
    assert_eq!(trees, vec![SyntaxTree::Text(Span::new(0, 9, 1, 1))]);
    assert_eq!(
        errors,
        vec![HtmlError::unterminated_comment(Span::new(0, 9, 1, 1))]
    );
}

#[test]
fn unterminated_doctype() {
    let (trees, errors) = scan("<!DOCTYPE html");
    assert_eq!(trees, vec![SyntaxTree::Text(Span::new(0, 14, 1, 1))]);
    assert_eq!(
        errors,
        vec![HtmlError::unterminated_doctype(Span::new(0, 14, 1, 1))]
    );
}

#[test]
fn unterminated_tag() {
    let (trees, errors) = scan("x<div");
    assert_eq!(
        trees,
        vec![
            SyntaxTree::Text(Span::new(0, 1, 1, 1)),
            SyntaxTree::Text(Span::new(1, 4, 1, 2)),
        ]
    );
    assert_eq!(
        errors,
        vec![HtmlError::unterminated_tag(Span::new(1, 4, 1, 2))]
    );
}

#[test]
fn scanning_resumes_after_unterminated_comment() {
    let (trees, errors) = scan("<!-- a <p>b</p>");
    assert_eq!(
        trees,
        vec![
            SyntaxTree::Text(Span::new(0, 7, 1, 1)),
            element(
                Span::new(7, 3, 1, 8),
                Span::new(8, 1, 1, 9),
                ElementKind::Open,
                true
            ),
            SyntaxTree::Text(Span::new(10, 1, 1, 11)),
            element(
                Span::new(11, 4, 1, 12),
                Span::new(13, 1, 1, 14),
                ElementKind::Close,
                true
            ),
        ]
    );
    assert_eq!(
        errors,
        vec![HtmlError::unterminated_comment(Span::new(0, 15, 1, 1))]
    );
}

// === Invalid attributes ===

#[test]
fn unquoted_attribute_is_invalid() {
    let (trees, errors) = scan("<a href=x>");
    assert_eq!(
        trees,
        vec![element(
            Span::new(0, 10, 1, 1),
            Span::new(1, 1, 1, 2),
            ElementKind::Open,
            false
        )]
    );
    assert_eq!(
        errors,
        vec![HtmlError::invalid_attribute(
            Span::new(3, 6, 1, 4),
            AttributeError::MissingQuote
        )]
    );
}

#[test]
fn open_quote_falls_back_to_first_gt() {
    let (trees, errors) = scan(r#"<a title="x>y"#);
    assert_eq!(
        trees,
        vec![
            element(
                Span::new(0, 12, 1, 1),
                Span::new(1, 1, 1, 2),
                ElementKind::Open,
                false
            ),
            SyntaxTree::Text(Span::new(12, 1, 1, 13)),
        ]
    );
    assert_eq!(
        errors,
        vec![HtmlError::invalid_attribute(
            Span::new(3, 8, 1, 4),
            AttributeError::UnterminatedValue
        )]
    );
}

#[test]
fn close_tag_with_attribute() {
    let (trees, errors) = scan(r#"</div class="x">"#);
    assert_eq!(
        trees,
        vec![element(
            Span::new(0, 16, 1, 1),
            Span::new(2, 3, 1, 3),
            ElementKind::Close,
            false
        )]
    );
    assert_eq!(
        errors,
        vec![HtmlError::invalid_attribute(
            Span::new(6, 9, 1, 7),
            AttributeError::OnCloseTag
        )]
    );
}

// === Malformed input at scale ===

/// Scan `unit` repeated `n` times; every unit must come back as one `Text`
/// and one error of `kind`, within a linear-time budget.
fn assert_linear(unit: &str, n: usize, kind: HtmlErrorKind) {
    let src = unit.repeat(n);
    let started = Instant::now();
    let (trees, errors) = scan(&src);
    let elapsed = started.elapsed();

    assert!(
        elapsed < Duration::from_secs(2),
        "{n} x {unit:?} took {elapsed:?}"
    );
    assert_eq!(trees.len(), n);
    assert_eq!(errors.len(), n);
    assert!(trees.iter().all(|t| matches!(t, SyntaxTree::Text(_))));
    assert!(errors.iter().all(|e| e.kind == kind));
    let last = errors.last().unwrap();
    assert_eq!(last.span.end() as usize, src.len());
}

#[test]
fn many_unterminated_tags() {
    assert_linear("<a ", 100_000, HtmlErrorKind::UnterminatedTag);
}

#[test]
fn many_unterminated_comments() {
    assert_linear("<!--x", 100_000, HtmlErrorKind::UnterminatedComment);
}

#[test]
fn many_unterminated_doctypes() {
    assert_linear("<!DOCTYPE x", 50_000, HtmlErrorKind::UnterminatedDoctype);
}

#[test]
fn many_tags_with_open_quotes() {
    assert_linear(r#"<a x=""#, 50_000, HtmlErrorKind::UnterminatedTag);
    assert_linear(r#"<a x=""#, 50_001, HtmlErrorKind::UnterminatedTag);
}

#[test]
fn open_quote_does_not_hide_later_tags() {
    let (trees, errors) = scan(r#"<a "x <p>ok</p>"#);
    assert_eq!(
        trees,
        vec![
            element(
                Span::new(0, 9, 1, 1),
                Span::new(1, 1, 1, 2),
                ElementKind::Open,
                false
            ),
            SyntaxTree::Text(Span::new(9, 2, 1, 10)),
            element(
                Span::new(11, 4, 1, 12),
                Span::new(13, 1, 1, 14),
                ElementKind::Close,
                true
            ),
        ]
    );
    assert_eq!(
        errors,
        vec![HtmlError::invalid_attribute(
            Span::new(3, 1, 1, 4),
            AttributeError::BadName
        )]
    );
}

#[test]
fn repeated_unterminated_comments_span_to_end() {
    let (_, errors) = scan("a\n<!-- one\n<!-- two\nend");
    assert_eq!(
        errors,
        vec![
            HtmlError::unterminated_comment(Span::new(2, 21, 2, 1)),
            HtmlError::unterminated_comment(Span::new(11, 12, 3, 1)),
        ]
    );
}

// === Iterator behavior ===

#[test]
fn errors_visible_during_iteration() {
    let mut tokenizer = HtmlTokenizer::new(b"<a href=x><b>");
    assert!(tokenizer.errors().is_empty());
    tokenizer.next();
    assert_eq!(tokenizer.errors().len(), 1);
    tokenizer.next();
    assert_eq!(tokenizer.errors().len(), 1);
}

#[test]
fn ordinary_buffers_are_not_truncated() {
    assert!(!HtmlTokenizer::new(b"<p>").is_truncated());
}

#[test]
fn fused_after_end() {
    let mut tokenizer = HtmlTokenizer::new(b"<p>");
    assert!(tokenizer.next().is_some());
    assert_eq!(tokenizer.next(), None);
    assert_eq!(tokenizer.next(), None);
}

#[test]
fn size_hint_bounds() {
    let tokenizer = HtmlTokenizer::new(b"<p>hi</p>");
    assert_eq!(tokenizer.size_hint(), (1, Some(9)));
    assert_eq!(HtmlTokenizer::new(b"").size_hint(), (0, Some(0)));
}

#[test]
fn span_tracks_position() {
    let mut tokenizer = HtmlTokenizer::new(b"<p>\nhi");
    tokenizer.next();
    tokenizer.next();
    assert_eq!(tokenizer.span(), Span::new(6, 0, 2, 3));
}

#[test]
fn evaluate_recovers_text() {
    let src = b"<p>hello</p>";
    let mut tokenizer = HtmlTokenizer::new(src);
    tokenizer.next();
    let text = tokenizer.next().unwrap();
    assert_eq!(tokenizer.evaluate(&text), b"hello");
}

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_scanner {
    use super::super::HtmlTokenizer;
    use crate::syntax_tree::SyntaxTree;
    use proptest::prelude::*;
    use spanlex_core::Spanned;

    /// Markup fragments, so generated input actually forms constructs.
    fn source() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                Just("<"),
                Just(">"),
                Just("</"),
                Just("\""),
                Just("="),
                Just("<!--"),
                Just("-->"),
                Just("<!DOCTYPE"),
                Just("div"),
                Just("a-b"),
                Just(" "),
                Just("\n"),
                Just("/"),
                Just("x"),
                Just("\u{e9}"),
            ],
            0..64,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn spans_tile_the_input(src in source()) {
            let bytes = src.as_bytes();
            let mut expected = 0u32;
            for tree in HtmlTokenizer::new(bytes) {
                let span = tree.span();
                prop_assert_eq!(span.offset, expected);
                prop_assert!(span.len > 0);
                expected = span.end();
            }
            prop_assert_eq!(expected as usize, bytes.len());
        }

        #[test]
        fn construct_shapes_hold(src in source()) {
            let bytes = src.as_bytes();
            for tree in HtmlTokenizer::new(bytes) {
                let text = tree.evaluate(bytes);
                match tree {
                    SyntaxTree::Element(element) => {
                        prop_assert_eq!(text.first(), Some(&b'<'));
                        prop_assert_eq!(text.last(), Some(&b'>'));
                        prop_assert!(element.span.contains(element.tag.offset));
                    }
                    SyntaxTree::Comment(_) => {
                        prop_assert!(text.starts_with(b"<!--"));
                        prop_assert!(text.ends_with(b"-->"));
                    }
                    SyntaxTree::Doctype(_) => {
                        prop_assert_eq!(text.last(), Some(&b'>'));
                    }
                    SyntaxTree::Text(_) => {
                        // Only the first byte may be a `<`.
                        prop_assert!(!text[1..].contains(&b'<'));
                    }
                }
            }
        }

        #[test]
        fn error_spans_lie_within_input(src in source()) {
            let bytes = src.as_bytes();
            let mut tokenizer = HtmlTokenizer::new(bytes);
            tokenizer.by_ref().for_each(drop);
            for error in tokenizer.errors() {
                prop_assert!(error.span.end() as usize <= bytes.len());
                if error.is_unterminated() {
                    prop_assert_eq!(error.span.end() as usize, bytes.len());
                }
            }
        }

        #[test]
        fn invalid_elements_have_errors(src in source()) {
            let bytes = src.as_bytes();
            let mut tokenizer = HtmlTokenizer::new(bytes);
            let invalid = tokenizer
                .by_ref()
                .filter(|tree| tree.as_element().is_some_and(|e| !e.validated))
                .count();
            let attribute_errors = tokenizer
                .errors()
                .iter()
                .filter(|e| !e.is_unterminated())
                .count();
            prop_assert_eq!(invalid, attribute_errors);
        }
    }
}
