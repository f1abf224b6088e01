//! Streaming tokenizer: one linear pass over an in-memory buffer, emitting
//! fixed-width rows in bounded chunks through a caller-supplied sink.
//!
//! The field-level state machine (`Unstarted | Unquoted | Quoted`) only runs
//! when the schema declares quoting. Quote-free input takes a whole-function
//! short-circuit that locates row boundaries and splits each line directly.
//! In both paths the scan advances with `memchr`/`memchr2` forward searches
//! rather than per-byte dispatch; the state machine exists for the minority of
//! fields that need quote-aware handling.
//!
//! The pass is synchronous and non-reentrant: the sink is invoked in strictly
//! increasing chunk-index order, once per full chunk and once more with
//! whatever remains at end of input. Cancellation is the sink's
//! [`ControlFlow::Break`] return, checked after every invocation.

use std::fmt;
use std::mem;
use std::ops::ControlFlow;
use std::sync::Arc;

use memchr::{memchr, memchr2};

use crate::error::{Error, ParseResult};
use crate::observe::{ParseObserver, ParseWarning};
use crate::types::{Chunk, Row, RowDelim, Schema};

/// Default rows per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// What to do when a row's field count differs from the schema's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Pad short rows with empty fields, truncate long rows. Default.
    #[default]
    Pad,
    /// Drop the mismatched row entirely.
    Skip,
    /// Fail the parse with [`Error::ColumnCountMismatch`].
    Reject,
}

/// What to do when input ends inside a quoted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuotePolicy {
    /// Close the field at end of input and report a warning. Default.
    #[default]
    CloseField,
    /// Fail the parse with [`Error::UnterminatedQuote`].
    Reject,
}

/// Options controlling one [`parse`] call.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ParseOptions {
    /// Rows per sink invocation. Default [`DEFAULT_CHUNK_SIZE`].
    pub chunk_size: usize,
    /// Stop scanning after this many chunks have been delivered.
    pub chunk_limit: Option<usize>,
    /// Stop scanning after this many rows; the partial chunk is delivered first.
    pub row_limit: Option<usize>,
    /// Probe mode: pad/truncate every row to this width instead of applying
    /// `column_mismatch`.
    pub forced_column_count: Option<usize>,
    /// Row-width policy outside probe mode.
    pub column_mismatch: MismatchPolicy,
    /// Unterminated-quote policy.
    pub unterminated_quote: QuotePolicy,
    /// Optional observer for warnings and chunk/completion events.
    pub observer: Option<Arc<dyn ParseObserver>>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_limit: None,
            row_limit: None,
            forced_column_count: None,
            column_mismatch: MismatchPolicy::default(),
            unterminated_quote: QuotePolicy::default(),
            observer: None,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_limit", &self.chunk_limit)
            .field("row_limit", &self.row_limit)
            .field("forced_column_count", &self.forced_column_count)
            .field("column_mismatch", &self.column_mismatch)
            .field("unterminated_quote", &self.unterminated_quote)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Counters reported after a successful [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseSummary {
    /// Rows delivered through the sink.
    pub rows: usize,
    /// Sink invocations.
    pub chunks: usize,
    /// `true` when the sink returned [`ControlFlow::Break`].
    pub cancelled: bool,
}

/// Scan `text` once, emitting rows in chunks of `options.chunk_size` through
/// `sink`.
///
/// The sink receives each chunk by value (a fresh `Vec` per chunk, so it may
/// be retained) together with its 0-based index, and steers the parse with its
/// return value: [`ControlFlow::Break`] stops the scan after the current
/// chunk.
///
/// Column width is `options.forced_column_count` when set, otherwise the
/// schema's declared count; with neither, the first row's width is adopted.
///
/// # Errors
///
/// [`Error::ColumnCountMismatch`] under [`MismatchPolicy::Reject`] and
/// [`Error::UnterminatedQuote`] under [`QuotePolicy::Reject`]; never otherwise.
pub fn parse<F>(
    text: &str,
    schema: &Schema,
    options: &ParseOptions,
    sink: F,
) -> ParseResult<ParseSummary>
where
    F: FnMut(Chunk, usize) -> ControlFlow<()>,
{
    let expected = options.forced_column_count.or_else(|| {
        (!schema.fields.is_empty()).then(|| schema.fields.len())
    });

    let tokenizer = Tokenizer {
        text,
        bytes: text.as_bytes(),
        delimiter: schema.delimiter,
        quote: schema.quote,
        row_delim: schema.row_delim,
        options,
        expected,
        probing: options.forced_column_count.is_some(),
        row: Row::with_capacity(expected.unwrap_or(8)),
        chunk: Vec::new(),
        chunk_index: 0,
        rows_emitted: 0,
        row_index: 0,
        mid_row: false,
        cancelled: false,
        done: false,
        sink,
    };
    tokenizer.run()
}

struct Tokenizer<'a, F> {
    text: &'a str,
    bytes: &'a [u8],
    delimiter: u8,
    quote: Option<u8>,
    row_delim: RowDelim,
    options: &'a ParseOptions,
    /// Declared/forced/discovered row width.
    expected: Option<usize>,
    probing: bool,
    row: Row,
    chunk: Chunk,
    chunk_index: usize,
    rows_emitted: usize,
    /// 0-based index of the row currently being built, counting skipped rows.
    row_index: usize,
    /// A column delimiter was consumed and the next field has not started yet.
    mid_row: bool,
    cancelled: bool,
    /// Limit reached or sink cancelled; stop scanning immediately.
    done: bool,
    sink: F,
}

impl<F> Tokenizer<'_, F>
where
    F: FnMut(Chunk, usize) -> ControlFlow<()>,
{
    fn run(mut self) -> ParseResult<ParseSummary> {
        match self.quote {
            None => self.scan_unquoted_input()?,
            Some(q) => self.scan_with_state_machine(q)?,
        }
        if !self.done && !self.chunk.is_empty() {
            self.flush_chunk();
        }

        let summary = ParseSummary {
            rows: self.rows_emitted,
            chunks: self.chunk_index,
            cancelled: self.cancelled,
        };
        if let Some(obs) = &self.options.observer {
            obs.on_complete(&summary);
        }
        Ok(summary)
    }

    /// Fast path: no quoting declared, so rows are exactly the spans between
    /// row delimiters and fields the spans between column delimiters.
    fn scan_unquoted_input(&mut self) -> ParseResult<()> {
        let len = self.bytes.len();
        let mut pos = 0;
        while pos < len && !self.done {
            let (line_end, next) = match memchr(b'\n', &self.bytes[pos..]) {
                Some(off) => {
                    let at = pos + off;
                    (self.strip_cr(at, pos), at + 1)
                }
                // Missing trailing terminator on the final row is tolerated.
                None => (len, len),
            };
            self.split_line(pos, line_end)?;
            pos = next;
        }
        Ok(())
    }

    fn split_line(&mut self, start: usize, end: usize) -> ParseResult<()> {
        let mut field_start = start;
        loop {
            match memchr(self.delimiter, &self.bytes[field_start..end]) {
                Some(off) => {
                    let at = field_start + off;
                    self.row.push(self.text[field_start..at].to_string());
                    field_start = at + 1;
                }
                None => {
                    self.row.push(self.text[field_start..end].to_string());
                    break;
                }
            }
        }
        self.end_row()
    }

    /// Quote-aware path: each iteration starts a field in the `Unstarted`
    /// state and leaves the scan position past the byte that committed it.
    fn scan_with_state_machine(&mut self, quote: u8) -> ParseResult<()> {
        let len = self.bytes.len();
        let mut pos = 0;
        while pos < len && !self.done {
            pos = if self.bytes[pos] == quote {
                self.quoted_field(quote, pos)?
            } else {
                self.unquoted_field(pos)?
            };
        }
        // A trailing column delimiter leaves one empty field pending.
        if !self.done && self.mid_row {
            self.row.push(String::new());
            self.mid_row = false;
            self.end_row()?;
        }
        Ok(())
    }

    /// `Unquoted` state: one forward scan to whichever delimiter comes first.
    fn unquoted_field(&mut self, start: usize) -> ParseResult<usize> {
        match memchr2(self.delimiter, b'\n', &self.bytes[start..]) {
            Some(off) => {
                let at = start + off;
                if self.bytes[at] == self.delimiter {
                    self.row.push(self.text[start..at].to_string());
                    self.mid_row = true;
                    Ok(at + 1)
                } else {
                    let end = self.strip_cr(at, start);
                    self.row.push(self.text[start..end].to_string());
                    self.mid_row = false;
                    self.end_row()?;
                    Ok(at + 1)
                }
            }
            None => {
                self.row.push(self.text[start..].to_string());
                self.mid_row = false;
                self.end_row()?;
                Ok(self.bytes.len())
            }
        }
    }

    /// `Quoted` state: forward scans between quote bytes; `""` is a literal
    /// quote, a lone quote closes the region.
    fn quoted_field(&mut self, quote: u8, open: usize) -> ParseResult<usize> {
        let mut seg_start = open + 1;
        let mut pos = seg_start;
        // Escape accumulator; fields without doubled quotes stay a single slice.
        let mut buf: Option<String> = None;

        loop {
            match memchr(quote, &self.bytes[pos..]) {
                None => {
                    match self.options.unterminated_quote {
                        QuotePolicy::Reject => {
                            return Err(Error::UnterminatedQuote { offset: open });
                        }
                        QuotePolicy::CloseField => {
                            self.warn(ParseWarning::UnterminatedQuote { offset: open });
                            let tail = &self.text[seg_start..];
                            let value = match buf {
                                Some(mut b) => {
                                    b.push_str(tail);
                                    b
                                }
                                None => tail.to_string(),
                            };
                            self.row.push(value);
                            self.mid_row = false;
                            self.end_row()?;
                            return Ok(self.bytes.len());
                        }
                    }
                }
                Some(off) => {
                    let at = pos + off;
                    if self.bytes.get(at + 1) == Some(&quote) {
                        let b = buf.get_or_insert_with(String::new);
                        b.push_str(&self.text[seg_start..at]);
                        b.push(quote as char);
                        pos = at + 2;
                        seg_start = pos;
                    } else {
                        let value = match buf {
                            Some(mut b) => {
                                b.push_str(&self.text[seg_start..at]);
                                b
                            }
                            None => self.text[seg_start..at].to_string(),
                        };
                        return self.commit_after_quote(value, at + 1);
                    }
                }
            }
        }
    }

    /// Back to `Unstarted`-equivalent handling: the delimiter must immediately
    /// follow the closing quote. Stray bytes before the next delimiter are
    /// appended to the field rather than erroring.
    fn commit_after_quote(&mut self, mut value: String, pos: usize) -> ParseResult<usize> {
        let len = self.bytes.len();
        if pos >= len {
            self.row.push(value);
            self.mid_row = false;
            self.end_row()?;
            return Ok(len);
        }
        let b = self.bytes[pos];
        if b == self.delimiter {
            self.row.push(value);
            self.mid_row = true;
            return Ok(pos + 1);
        }
        if b == b'\n' {
            self.row.push(value);
            self.mid_row = false;
            self.end_row()?;
            return Ok(pos + 1);
        }
        if b == b'\r' && self.bytes.get(pos + 1) == Some(&b'\n') {
            self.row.push(value);
            self.mid_row = false;
            self.end_row()?;
            return Ok(pos + 2);
        }

        match memchr2(self.delimiter, b'\n', &self.bytes[pos..]) {
            Some(off) => {
                let at = pos + off;
                if self.bytes[at] == self.delimiter {
                    value.push_str(&self.text[pos..at]);
                    self.row.push(value);
                    self.mid_row = true;
                    Ok(at + 1)
                } else {
                    let end = self.strip_cr(at, pos);
                    value.push_str(&self.text[pos..end]);
                    self.row.push(value);
                    self.mid_row = false;
                    self.end_row()?;
                    Ok(at + 1)
                }
            }
            None => {
                value.push_str(&self.text[pos..]);
                self.row.push(value);
                self.mid_row = false;
                self.end_row()?;
                Ok(len)
            }
        }
    }

    /// End of field slice when `at` points at `\n`: drop the preceding `\r`
    /// for CrLf input.
    fn strip_cr(&self, at: usize, floor: usize) -> usize {
        if self.row_delim == RowDelim::CrLf && at > floor && self.bytes[at - 1] == b'\r' {
            at - 1
        } else {
            at
        }
    }

    /// Commit the completed row into the current chunk, applying the width
    /// policy, then flush/stop per chunk size and limits.
    fn end_row(&mut self) -> ParseResult<()> {
        let found = self.row.len();
        let index = self.row_index;
        self.row_index += 1;

        match self.expected {
            None => self.expected = Some(found),
            Some(expected) if found != expected => {
                if self.probing {
                    // Probe mode pads/truncates silently; the true width is
                    // not known yet.
                    self.row.resize(expected, String::new());
                } else {
                    match self.options.column_mismatch {
                        MismatchPolicy::Pad => {
                            self.warn(ParseWarning::ColumnCountMismatch {
                                row: index,
                                expected,
                                found,
                            });
                            self.row.resize(expected, String::new());
                        }
                        MismatchPolicy::Skip => {
                            self.warn(ParseWarning::ColumnCountMismatch {
                                row: index,
                                expected,
                                found,
                            });
                            self.row.clear();
                            return Ok(());
                        }
                        MismatchPolicy::Reject => {
                            return Err(Error::ColumnCountMismatch {
                                row: index,
                                expected,
                                found,
                            });
                        }
                    }
                }
            }
            Some(_) => {}
        }

        let width = self.expected.unwrap_or(8);
        let completed = mem::replace(&mut self.row, Row::with_capacity(width));
        self.chunk.push(completed);
        self.rows_emitted += 1;

        if self.options.row_limit.is_some_and(|limit| self.rows_emitted >= limit) {
            // Deliver exactly `limit` rows, then stop without scanning on.
            self.flush_chunk();
            self.done = true;
            return Ok(());
        }

        if self.chunk.len() >= self.options.chunk_size.max(1) {
            self.flush_chunk();
            if self.options.chunk_limit.is_some_and(|limit| self.chunk_index >= limit) {
                self.done = true;
            }
        }
        Ok(())
    }

    fn flush_chunk(&mut self) {
        if self.chunk.is_empty() {
            return;
        }
        let capacity = self.chunk.capacity();
        let rows = mem::replace(&mut self.chunk, Vec::with_capacity(capacity));
        if let Some(obs) = &self.options.observer {
            obs.on_chunk(self.chunk_index, rows.len());
        }
        let flow = (self.sink)(rows, self.chunk_index);
        self.chunk_index += 1;
        if flow.is_break() {
            self.cancelled = true;
            self.done = true;
        }
    }

    fn warn(&self, warning: ParseWarning) {
        if let Some(obs) = &self.options.observer {
            obs.on_warning(&warning);
        }
    }
}
