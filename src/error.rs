use thiserror::Error;

/// Convenience result type for parse operations.
pub type ParseResult<T> = Result<T, Error>;

/// Error type shared across sniffing, tokenizing, and probing.
///
/// The parse core is a pure single-pass transform with no retries: a sniff
/// failure is fatal to the whole parse, while quote and column-count problems
/// only become errors when the corresponding [`crate::tokenizer::ParseOptions`]
/// policy asks for them.
#[derive(Debug, Error)]
pub enum Error {
    /// The header line contains none of the candidate column delimiters.
    ///
    /// Sniffing cannot proceed; callers must supply a [`crate::types::Schema`]
    /// explicitly.
    #[error("no column delimiter found in header line (candidates: tab, '|', ';', ',')")]
    NoDelimiterFound,

    /// Input ended while still inside a quoted field.
    ///
    /// Raised only under [`crate::tokenizer::QuotePolicy::Reject`]; the default
    /// policy closes the field at end of input and reports a warning instead.
    #[error("unterminated quoted field starting at byte offset {offset}")]
    UnterminatedQuote { offset: usize },

    /// A row yielded a different number of fields than the schema declares.
    ///
    /// Raised only under [`crate::tokenizer::MismatchPolicy::Reject`]; `row` is
    /// the 0-based data row index.
    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Probing was asked to infer a schema from input with no rows.
    #[error("cannot probe schema: input contains no rows")]
    EmptyInput,
}
