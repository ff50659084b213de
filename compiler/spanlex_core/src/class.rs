//! Byte classification shared by every tokenizer in the workspace.
//!
//! Classification is a partition of the byte alphabet: each of the 256 byte
//! values belongs to exactly one [`ByteClass`]. The base tokenizer relies on
//! that to be infallible; the HTML tokenizer composes the same predicates
//! with its own grouping rules.

/// Character class of a single byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ByteClass {
    /// `A-Z`, `a-z`, `_`. May start or continue an identifier.
    IdentStart,
    /// `0-9`. May continue an identifier but not start one.
    Digit,
    /// ASCII whitespace, see [`is_whitespace`].
    Whitespace,
    /// Everything else, including all non-ASCII bytes.
    Punct,
}

const IDENT_START: u8 = 1;
const IDENT_CONTINUE: u8 = 1 << 1;
const WHITESPACE: u8 = 1 << 2;

/// 256-byte lookup table of class bits.
/// Table lookup replaces the multi-range `matches!` with a single indexed read.
#[allow(
    clippy::cast_possible_truncation,
    reason = "loop counter i is 0..=255, always fits in u8"
)]
static CLASS_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0u16;
    while i < 256 {
        let b = i as u8;
        let mut bits = 0;
        if matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'_') {
            bits |= IDENT_START | IDENT_CONTINUE;
        }
        if b.is_ascii_digit() {
            bits |= IDENT_CONTINUE;
        }
        if b.is_ascii_whitespace() {
            bits |= WHITESPACE;
        }
        table[i as usize] = bits;
        i += 1;
    }
    table
};

/// Returns `true` if `b` may start an identifier: `[A-Za-z_]`.
#[inline]
pub fn is_ident_start(b: u8) -> bool {
    CLASS_TABLE[b as usize] & IDENT_START != 0
}

/// Returns `true` if `b` may continue an identifier: `[A-Za-z0-9_]`.
#[inline]
pub fn is_ident_continue(b: u8) -> bool {
    CLASS_TABLE[b as usize] & IDENT_CONTINUE != 0
}

/// Returns `true` for ASCII whitespace as defined by
/// [`u8::is_ascii_whitespace`]: space, `\t`, `\n`, form feed, `\r`.
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    CLASS_TABLE[b as usize] & WHITESPACE != 0
}

/// Classify a single byte.
#[inline]
pub fn classify(b: u8) -> ByteClass {
    let bits = CLASS_TABLE[b as usize];
    if bits & IDENT_START != 0 {
        ByteClass::IdentStart
    } else if bits & IDENT_CONTINUE != 0 {
        ByteClass::Digit
    } else if bits & WHITESPACE != 0 {
        ByteClass::Whitespace
    } else {
        ByteClass::Punct
    }
}
