//! HTML tokenizer over `spanlex_core`.
//!
//! Produces a flat stream of [`SyntaxTree`] entries: doctypes, comments,
//! tags, and text. Like the base tokenizer it never copies source bytes;
//! every entry is a [`Span`] (or spans) into the caller's buffer.
//!
//! ```text
//! <div class="a">hi</div>
//! └──── Element ─┘└Text┘└Element┘
//! ```
//!
//! There is no nesting: matching an open tag with its close tag is left
//! to consumers. Malformed constructs do not stop the scan; they are
//! collected as [`HtmlError`]s alongside the stream.
//!
//! # Tracing
//!
//! Scanning logs through `tracing`: one `trace` event per construct and a
//! `debug` event per error. Call [`init_tracing`] and set `RUST_LOG`
//! (e.g. `RUST_LOG=spanlex_html=trace`) to see them.

mod attr;
mod html_error;
mod scanner;
mod syntax_tree;

use std::sync::Once;

pub use attr::validate_attributes;
pub use html_error::{AttributeError, HtmlError, HtmlErrorKind};
pub use scanner::HtmlTokenizer;
pub use spanlex_core::{Span, Spanned};
pub use syntax_tree::{Element, ElementKind, SyntaxTree};

/// Result of tokenizing a whole buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlOutput {
    /// Every entry, in source order. Spans tile the input.
    pub trees: Vec<SyntaxTree>,
    /// Errors in the order they were found.
    pub errors: Vec<HtmlError>,
}

impl HtmlOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Tokenize an entire buffer as HTML.
#[tracing::instrument(level = "debug", skip_all, fields(len = buf.len()))]
pub fn tokenize_html(buf: &[u8]) -> HtmlOutput {
    let mut tokenizer = HtmlTokenizer::new(buf);
    let trees: Vec<SyntaxTree> = tokenizer.by_ref().collect();
    let errors = tokenizer.into_errors();
    tracing::debug!(trees = trees.len(), errors = errors.len(), "tokenized");
    HtmlOutput { trees, errors }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
