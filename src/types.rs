//! Core data model types for delimited-text parsing.
//!
//! A [`Schema`] describes one input's dialect (delimiters, quoting) and its typed
//! [`Field`]s. It is produced once by the sniffer/prober and consumed unchanged by
//! every later parse of structurally identical input; it is pure data and can be
//! serialized by the caller to skip re-sniffing.

use serde::{Deserialize, Serialize};

/// A raw parsed row: one `String` per column, index-aligned with [`Schema::fields`].
pub type Row = Vec<String>;

/// A bounded batch of rows handed to the chunk sink.
pub type Chunk = Vec<Row>;

/// Row-terminator sequence, fixed for the whole input by the sniffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowDelim {
    /// Bare line feed (`"\n"`).
    Lf,
    /// Carriage return + line feed (`"\r\n"`).
    CrLf,
}

impl RowDelim {
    /// The terminator as a string slice.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Terminator length in bytes (1 or 2).
    pub fn len(self) -> usize {
        self.as_str().len()
    }
}

impl Default for RowDelim {
    fn default() -> Self {
        Self::Lf
    }
}

/// Logical column type guessed by the schema prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// UTF-8 string; the default when nothing stronger can be proven.
    Utf8,
    /// Finite floating-point number.
    Number,
    /// Boolean. Only inferred when probing opts in; see `ProbeOptions::infer_booleans`.
    Bool,
}

impl Default for ColumnType {
    fn default() -> Self {
        Self::Utf8
    }
}

/// A single named, typed column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name, taken verbatim from the header row (not trimmed).
    pub name: String,
    /// Probed column type.
    pub data_type: ColumnType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Dialect plus column layout for one input shape.
///
/// The sniffer fills `delimiter`, `row_delim`, and `quote`; the prober fills
/// `fields`. Names keep source order and are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Quote byte, or `None` when the input is quote-free (enables the fast path).
    pub quote: Option<u8>,
    /// Column delimiter byte.
    pub delimiter: u8,
    /// Row terminator, fixed for the whole input.
    pub row_delim: RowDelim,
    /// Ordered column list; empty until probed.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a schema from a full dialect + column list.
    pub fn new(delimiter: u8, row_delim: RowDelim, quote: Option<u8>, fields: Vec<Field>) -> Self {
        Self {
            quote,
            delimiter,
            row_delim,
            fields,
        }
    }

    /// Number of declared columns (0 until probed).
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    ///
    /// When names repeat, the first occurrence wins.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value produced by the coercion compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Empty source field or a slot the row never filled.
    Missing,
    /// The literal text `null`, distinct from [`TypedValue::Missing`].
    Null,
    /// Boolean (`true`/`false`, case-insensitive in the source).
    Bool(bool),
    /// Finite number, or NaN when a numeric column's value failed to parse.
    Number(f64),
    /// ISO-8601 timestamp, normalized to UTC.
    Timestamp(chrono::DateTime<chrono::Utc>),
    /// Structured data parsed from an embedded JSON field.
    Json(serde_json::Value),
    /// UTF-8 string; also the fallback for failed non-numeric conversions.
    Utf8(String),
}

impl TypedValue {
    /// `true` for [`TypedValue::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// `true` for [`TypedValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
