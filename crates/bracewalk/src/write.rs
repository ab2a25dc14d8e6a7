//! Writing text back in notation form.

use core::fmt;

use bstr::ByteSlice;

#[cfg(feature = "values")]
use crate::class::{CharClass, CharTable};

/// Writes `text` as a quoted run: `quote`, the text with every `quote`
/// doubled, `quote`.
///
/// The parser reads the output back to `text` exactly, provided `text` is
/// valid UTF-8 and holds no newline (a quoted run must close on the line it
/// opened). Invalid UTF-8 is written as U+FFFD.
///
/// # Errors
///
/// Fails only if `out` does.
///
/// # Examples
///
/// ```
/// let mut out = String::new();
/// bracewalk::write_quoted(br#"say "hi""#, b'"', &mut out).unwrap();
/// assert_eq!(out, r#""say ""hi""""#);
/// ```
pub fn write_quoted<W: fmt::Write + ?Sized>(text: &[u8], quote: u8, out: &mut W) -> fmt::Result {
    let quote = char::from(quote);
    out.write_char(quote)?;
    for ch in text.chars() {
        if ch == quote {
            out.write_char(quote)?;
        }
        out.write_char(ch)?;
    }
    out.write_char(quote)
}

/// Writes `text` bare when it reads back as one unquoted run, quoted
/// otherwise.
#[cfg(feature = "values")]
pub(crate) fn write_text<W: fmt::Write + ?Sized>(
    text: &[u8],
    table: &CharTable,
    quote: u8,
    out: &mut W,
) -> fmt::Result {
    let bare = text.is_utf8()
        && !text.is_empty()
        && text.iter().all(|&b| table.class(b) == CharClass::Normal);
    if bare {
        out.write_str(text.to_str_lossy().as_ref())
    } else {
        write_quoted(text, quote, out)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", r#""""#)]
    #[case("z", r#""z""#)]
    #[case(r#"""#, r#""""""#)]
    #[case(r#"z"""#, r#""z""""""#)]
    #[case("a b=c", r#""a b=c""#)]
    fn doubles_quotes(#[case] text: &str, #[case] expected: &str) {
        let mut out = String::new();
        write_quoted(text.as_bytes(), b'"', &mut out).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn custom_quote() {
        let mut out = String::new();
        write_quoted(b"it's", b'\'', &mut out).unwrap();
        assert_eq!(out, "'it''s'");
    }

    #[cfg(feature = "values")]
    #[rstest]
    #[case("abc", "abc")]
    #[case("", r#""""#)]
    #[case("a b", r#""a b""#)]
    #[case("x=1", r#""x=1""#)]
    #[case("ü", "ü")]
    fn bare_when_possible(#[case] text: &str, #[case] expected: &str) {
        let options = crate::NotationOptions::default();
        let table = CharTable::new(&options).unwrap();
        let mut out = String::new();
        write_text(text.as_bytes(), &table, options.quote, &mut out).unwrap();
        assert_eq!(out, expected);
    }
}
