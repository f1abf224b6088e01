//! Dialect sniffing: choose delimiters and quoting from the first line.
//!
//! The sniffer looks at one line only. The terminator that ends the header
//! (`"\n"` or `"\r\n"`, or nothing for single-line input) becomes the row
//! delimiter for the entire input; no per-row re-detection happens later.
//! Quoting is a single boolean over the whole document: if the quote byte
//! appears anywhere, every later parse runs quote-aware. Malformed quoting in
//! otherwise-unquoted data therefore degrades silently rather than erroring.

use memchr::memchr;

use crate::error::{Error, ParseResult};
use crate::types::{RowDelim, Schema};

/// Candidate column delimiters, in priority order.
pub const DELIMITER_CANDIDATES: [u8; 4] = [b'\t', b'|', b';', b','];

/// The quote byte recognized by the sniffer and tokenizer.
pub const QUOTE: u8 = b'"';

/// Sniff dialect from `text`, returning a [`Schema`] with empty `fields`.
///
/// The column delimiter is the first candidate (tab, pipe, semicolon, comma)
/// that occurs at least once in the header line. Fails with
/// [`Error::NoDelimiterFound`] if none occur; callers must then supply a
/// schema explicitly.
pub fn sniff(text: &str) -> ParseResult<Schema> {
    let (header, row_delim) = leading_line(text);

    let header_bytes = header.as_bytes();
    let delimiter = DELIMITER_CANDIDATES
        .into_iter()
        .find(|&cand| memchr(cand, header_bytes).is_some())
        .ok_or(Error::NoDelimiterFound)?;

    let quote = memchr(QUOTE, text.as_bytes()).map(|_| QUOTE);

    Ok(Schema::new(delimiter, row_delim, quote, Vec::new()))
}

/// Split off the first line and classify its terminator.
///
/// A missing terminator (single-line input) defaults the row delimiter to
/// [`RowDelim::Lf`].
pub(crate) fn leading_line(text: &str) -> (&str, RowDelim) {
    match memchr(b'\n', text.as_bytes()) {
        Some(nl) if nl > 0 && text.as_bytes()[nl - 1] == b'\r' => (&text[..nl - 1], RowDelim::CrLf),
        Some(nl) => (&text[..nl], RowDelim::Lf),
        None => (text, RowDelim::Lf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_comma_and_lf() {
        let schema = sniff("a,b,c\n1,2,3\n").unwrap();
        assert_eq!(schema.delimiter, b',');
        assert_eq!(schema.row_delim, RowDelim::Lf);
        assert_eq!(schema.quote, None);
        assert!(schema.fields.is_empty());
    }

    #[test]
    fn tab_beats_comma_in_priority() {
        let schema = sniff("a\tb,c\n").unwrap();
        assert_eq!(schema.delimiter, b'\t');
    }

    #[test]
    fn crlf_terminator_becomes_row_delim() {
        let schema = sniff("a;b\r\n1;2\r\n").unwrap();
        assert_eq!(schema.delimiter, b';');
        assert_eq!(schema.row_delim, RowDelim::CrLf);
    }

    #[test]
    fn quote_anywhere_enables_quoting() {
        // Quote only appears in a later row; heuristic is global.
        let schema = sniff("a,b\n1,\"x,y\"\n").unwrap();
        assert_eq!(schema.quote, Some(b'"'));
    }

    #[test]
    fn headerless_single_line_defaults_to_lf() {
        let schema = sniff("x|y|z").unwrap();
        assert_eq!(schema.delimiter, b'|');
        assert_eq!(schema.row_delim, RowDelim::Lf);
    }

    #[test]
    fn no_candidate_delimiter_is_an_error() {
        let err = sniff("justoneword\nanother\n").unwrap_err();
        assert!(matches!(err, Error::NoDelimiterFound));
    }
}
