//! `rowscan` is a small library for parsing delimited text (the CSV family)
//! from an in-memory buffer into structured rows, with dialect sniffing,
//! bounded schema probing, and compiled typed-row coercion.
//!
//! The caller owns all I/O: load the text however you like and hand the core
//! a `&str`. Rows come back through a chunk sink; nothing is buffered beyond
//! the current chunk.
//!
//! ## Pipeline
//!
//! - [`sniffer::sniff`]: pick the column delimiter (tab, pipe, semicolon, or
//!   comma), the row delimiter (`\n` or `\r\n`), and whether quoting is in
//!   play, all from the first line.
//! - [`tokenizer::parse`]: scan the buffer once, emitting rows in chunks of
//!   [`tokenizer::ParseOptions::chunk_size`] (default 5000) through a sink
//!   that can cancel via [`std::ops::ControlFlow::Break`].
//! - [`probe::probe_schema`]: sample a handful of rows, take column names
//!   from the header and per-column type guesses from the rest.
//! - [`coerce::RowConverter`]: classify each column once from the sample and
//!   convert raw rows to typed rows or records.
//!
//! ## Quick example: probe, then parse typed records
//!
//! ```rust
//! use std::ops::ControlFlow;
//!
//! use rowscan::coerce::RowConverter;
//! use rowscan::probe::probe_schema;
//! use rowscan::tokenizer::{parse, ParseOptions};
//! use rowscan::types::TypedValue;
//!
//! # fn main() -> Result<(), rowscan::Error> {
//! let text = "id,name,active\n1,Alice,true\n2,\"Bob, Jr.\",false\n";
//!
//! let probed = probe_schema(text)?;
//! let converter = RowConverter::build(probed.schema.field_names(), &probed.samples, false);
//!
//! let mut typed = Vec::new();
//! parse(text, &probed.schema, &ParseOptions::default(), |chunk, _| {
//!     // Skip the header row in chunk 0.
//!     for row in chunk.iter().skip(if typed.is_empty() { 1 } else { 0 }) {
//!         typed.push(converter.convert_values(row));
//!     }
//!     ControlFlow::Continue(())
//! })?;
//!
//! assert_eq!(typed[0][0], TypedValue::Number(1.0));
//! assert_eq!(typed[1][1], TypedValue::Utf8("Bob, Jr.".to_string()));
//! assert_eq!(typed[1][2], TypedValue::Bool(false));
//! # Ok(())
//! # }
//! ```
//!
//! ## Reusing a schema
//!
//! The [`types::Schema`] is pure data and serializes with serde; persist it to
//! skip re-sniffing on repeat parses of structurally identical input.
//!
//! ## Modules
//!
//! - [`sniffer`]: dialect detection from the first line
//! - [`tokenizer`]: the streaming field/row state machine
//! - [`probe`]: bounded sampling and type inference
//! - [`coerce`]: compiled raw-to-typed row conversion
//! - [`types`]: schema and value types
//! - [`observe`]: observer hooks for warnings and progress
//! - [`error`]: error types used across the crate

pub mod coerce;
pub mod error;
pub mod observe;
pub mod probe;
pub mod sniffer;
pub mod tokenizer;
pub mod types;

pub use error::{Error, ParseResult};

use std::ops::ControlFlow;

use crate::tokenizer::ParseOptions;
use crate::types::{Row, Schema};

/// Parse `text` and accumulate every emitted row into one `Vec`.
///
/// Convenience wrapper over [`tokenizer::parse`] for callers that do not need
/// streaming delivery; it is implemented strictly as a sink that extends a
/// buffer.
///
/// # Errors
///
/// Whatever [`tokenizer::parse`] returns for these options.
pub fn parse_all(text: &str, schema: &Schema, options: &ParseOptions) -> ParseResult<Vec<Row>> {
    let mut rows = Vec::new();
    tokenizer::parse(text, schema, options, |chunk, _| {
        rows.extend(chunk);
        ControlFlow::Continue(())
    })?;
    Ok(rows)
}
