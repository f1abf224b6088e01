//! Bounded schema probing: sniff the dialect, sample a handful of rows, and
//! fill in column names and types.
//!
//! Probing is a lenient sampling pass, not a full-document parse: the
//! tokenizer runs in probe mode with a forced column width taken from a
//! quote-naive delimiter count of the header line, so a header whose true
//! width is not yet known still yields usable rows (padded or truncated).

use std::ops::ControlFlow;

use memchr::memchr_iter;

use crate::error::{Error, ParseResult};
use crate::sniffer::{leading_line, sniff};
use crate::tokenizer::{parse, ParseOptions};
use crate::types::{ColumnType, Field, Row, Schema};

/// Default number of sampled rows (header included).
pub const DEFAULT_SAMPLE_LIMIT: usize = 10;

/// Options controlling [`probe_schema_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Maximum rows sampled, counting the header row. Default 10.
    pub sample_limit: usize,
    /// Also infer [`ColumnType::Bool`] for columns whose every sampled value
    /// is case-insensitive `true`/`false`. Off by default: probing infers
    /// numbers only unless asked.
    pub infer_booleans: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            infer_booleans: false,
        }
    }
}

/// A probed [`Schema`] plus the raw data rows it was derived from.
///
/// `samples` excludes the header row (its values became the field names) and
/// is what [`crate::coerce::RowConverter::build`] classifies against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedSchema {
    /// Finished schema: dialect from the sniffer, fields from the sample.
    pub schema: Schema,
    /// Sampled data rows, padded to the schema width.
    pub samples: Vec<Row>,
}

/// Probe with default options.
///
/// # Errors
///
/// [`Error::NoDelimiterFound`] when sniffing fails and [`Error::EmptyInput`]
/// when the input has no rows at all.
pub fn probe_schema(text: &str) -> ParseResult<ProbedSchema> {
    probe_schema_with(text, &ProbeOptions::default())
}

/// Probe `text`: sniff the dialect, tokenize up to `options.sample_limit`
/// rows in probe mode, take column names from the first row (verbatim, not
/// trimmed) and a type guess from the rest.
///
/// A column is [`ColumnType::Number`] iff every sampled value parses as a
/// finite `f64` — column names play no part in inference. Everything else
/// stays [`ColumnType::Utf8`] unless `infer_booleans` is set.
pub fn probe_schema_with(text: &str, options: &ProbeOptions) -> ParseResult<ProbedSchema> {
    let mut schema = sniff(text)?;

    let (header, _) = leading_line(text);
    // Quote-naive width guess; probe mode pads, so overcounting a quoted
    // header still produces usable sample rows.
    let forced_width = memchr_iter(schema.delimiter, header.as_bytes()).count() + 1;

    let parse_options = ParseOptions {
        chunk_size: options.sample_limit.max(1),
        row_limit: Some(options.sample_limit.max(1)),
        forced_column_count: Some(forced_width),
        ..Default::default()
    };

    let mut sampled: Vec<Row> = Vec::new();
    parse(text, &schema, &parse_options, |chunk, _| {
        sampled.extend(chunk);
        ControlFlow::Continue(())
    })?;

    if sampled.is_empty() {
        return Err(Error::EmptyInput);
    }

    let header_row = sampled.remove(0);
    let fields = header_row
        .into_iter()
        .enumerate()
        .map(|(col, name)| Field::new(name, infer_column_type(&sampled, col, options)))
        .collect();
    schema.fields = fields;

    Ok(ProbedSchema {
        schema,
        samples: sampled,
    })
}

fn infer_column_type(rows: &[Row], col: usize, options: &ProbeOptions) -> ColumnType {
    if rows.is_empty() {
        return ColumnType::Utf8;
    }
    let values = || rows.iter().filter_map(|r| r.get(col).map(String::as_str));

    if values().all(|v| v.parse::<f64>().is_ok_and(f64::is_finite)) {
        return ColumnType::Number;
    }
    if options.infer_booleans
        && values().all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
    {
        return ColumnType::Bool;
    }
    ColumnType::Utf8
}
