//! Compiled row coercion: classify each column once from sampled rows, then
//! apply the resulting dispatch table to every row.
//!
//! The specialization is an ordered [`ColumnCoercion`] table built once per
//! schema by [`RowConverter::build`] and applied in a fixed loop, so the
//! per-row work is a plain indexed dispatch with no per-value classification.
//!
//! Classification is a heuristic over the sample only: a later row that
//! violates its column's kind is still run through the same conversion and
//! degrades (NaN for numbers, raw string passthrough otherwise) rather than
//! erroring. Degradations are counted, never raised.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::types::{Row, TypedValue};

/// Conversion kind assigned to one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// No conversion; fields stay strings.
    Utf8,
    /// `f64` parse; failures yield `Number(NaN)`.
    Number,
    /// Case-insensitive `true`/`false`.
    Boolean,
    /// ISO-8601 timestamp, normalized to UTC.
    Timestamp,
    /// Embedded JSON document (`[...]` or `{...}`).
    Json,
}

/// One column's slot in the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCoercion {
    /// Column name, used for record-shaped output.
    pub name: String,
    /// Conversion applied to every value in this column.
    pub kind: ColumnKind,
}

/// A converted row: positional or keyed, per the converter's `as_records`.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedRow {
    /// Ordered typed values, index-aligned with the columns.
    Values(Vec<TypedValue>),
    /// `(column name, typed value)` pairs in column order.
    Record(Vec<(String, TypedValue)>),
}

/// Column-count-specific conversion routine, built once per schema.
#[derive(Debug)]
pub struct RowConverter {
    columns: Vec<ColumnCoercion>,
    as_records: bool,
    fallbacks: AtomicU64,
}

impl RowConverter {
    /// Build the dispatch table from column names and sampled rows.
    ///
    /// Each column is classified from the first sampled value that is neither
    /// empty nor the literal `null`, independent of the prober's inference;
    /// a column with no such value converts as [`ColumnKind::Utf8`].
    pub fn build<N, S>(column_names: N, samples: &[Row], as_records: bool) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = column_names
            .into_iter()
            .enumerate()
            .map(|(col, name)| ColumnCoercion {
                name: name.into(),
                kind: classify_column(samples, col),
            })
            .collect();
        Self {
            columns,
            as_records,
            fallbacks: AtomicU64::new(0),
        }
    }

    /// The compiled per-column table, in column order.
    pub fn columns(&self) -> &[ColumnCoercion] {
        &self.columns
    }

    /// Whether [`RowConverter::convert`] produces records or positional rows.
    pub fn as_records(&self) -> bool {
        self.as_records
    }

    /// Cumulative count of values that failed their column's conversion and
    /// degraded to a sentinel.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Convert one raw row into the shape selected at build time.
    pub fn convert(&self, row: &[String]) -> CoercedRow {
        if self.as_records {
            CoercedRow::Record(self.convert_record(row))
        } else {
            CoercedRow::Values(self.convert_values(row))
        }
    }

    /// Convert one raw row into positional typed values.
    ///
    /// Output length always equals the column count; slots the row does not
    /// cover come out [`TypedValue::Missing`].
    pub fn convert_values(&self, row: &[String]) -> Vec<TypedValue> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| self.convert_field(column.kind, row.get(i).map(String::as_str)))
            .collect()
    }

    /// Convert one raw row into `(name, value)` pairs in column order.
    pub fn convert_record(&self, row: &[String]) -> Vec<(String, TypedValue)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let value = self.convert_field(column.kind, row.get(i).map(String::as_str));
                (column.name.clone(), value)
            })
            .collect()
    }

    fn convert_field(&self, kind: ColumnKind, raw: Option<&str>) -> TypedValue {
        let raw = match raw {
            None | Some("") => return TypedValue::Missing,
            Some(r) => r,
        };
        if raw == "null" {
            return TypedValue::Null;
        }

        match kind {
            ColumnKind::Utf8 => TypedValue::Utf8(raw.to_string()),
            ColumnKind::Number => match raw.parse::<f64>() {
                Ok(n) => TypedValue::Number(n),
                Err(_) => {
                    self.fallbacks.fetch_add(1, Ordering::Relaxed);
                    TypedValue::Number(f64::NAN)
                }
            },
            ColumnKind::Boolean => {
                if raw.eq_ignore_ascii_case("true") {
                    TypedValue::Bool(true)
                } else if raw.eq_ignore_ascii_case("false") {
                    TypedValue::Bool(false)
                } else {
                    self.fallbacks.fetch_add(1, Ordering::Relaxed);
                    TypedValue::Utf8(raw.to_string())
                }
            }
            ColumnKind::Timestamp => match parse_timestamp(raw) {
                Some(ts) => TypedValue::Timestamp(ts),
                None => {
                    self.fallbacks.fetch_add(1, Ordering::Relaxed);
                    TypedValue::Utf8(raw.to_string())
                }
            },
            ColumnKind::Json => match serde_json::from_str(raw) {
                Ok(v) => TypedValue::Json(v),
                Err(_) => {
                    self.fallbacks.fetch_add(1, Ordering::Relaxed);
                    TypedValue::Utf8(raw.to_string())
                }
            },
        }
    }
}

fn classify_column(samples: &[Row], col: usize) -> ColumnKind {
    samples
        .iter()
        .filter_map(|r| r.get(col))
        .find(|v| !v.is_empty() && v.as_str() != "null")
        .map_or(ColumnKind::Utf8, |v| classify_value(v))
}

fn classify_value(value: &str) -> ColumnKind {
    if looks_like_timestamp(value) && parse_timestamp(value).is_some() {
        return ColumnKind::Timestamp;
    }
    if value.parse::<f64>().is_ok_and(f64::is_finite) {
        return ColumnKind::Number;
    }
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return ColumnKind::Boolean;
    }
    if (value.starts_with('[') || value.starts_with('{'))
        && serde_json::from_str::<serde_json::Value>(value).is_ok()
    {
        return ColumnKind::Json;
    }
    ColumnKind::Utf8
}

/// Cheap shape check for `YYYY-MM-DDThh:mm:ss...` before handing the value to
/// the real parser.
fn looks_like_timestamp(value: &str) -> bool {
    let b = value.as_bytes();
    b.len() >= 19
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[7] == b'-'
        && b[10] == b'T'
        && b[13] == b':'
        && b[16] == b':'
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offset-free timestamps are treated as UTC.
    value.parse::<NaiveDateTime>().ok().map(|ndt| ndt.and_utc())
}
