//! Observer hooks for parse progress and tolerated degradations.
//!
//! The tokenizer never logs on its own. Callers that want visibility into the
//! lenient paths (closed unterminated quotes, padded/skipped rows) or into
//! chunk delivery attach a [`ParseObserver`] via
//! [`crate::tokenizer::ParseOptions::observer`].

use std::fmt;
use std::sync::Arc;

use crate::tokenizer::ParseSummary;

/// A tolerated degradation encountered mid-parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseWarning {
    /// Input ended inside a quoted field; the field was closed at end of input.
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        offset: usize,
    },
    /// A row was padded, truncated, or skipped to fit the declared width.
    ColumnCountMismatch {
        /// 0-based row index.
        row: usize,
        /// Declared column count.
        expected: usize,
        /// Fields actually found.
        found: usize,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedQuote { offset } => {
                write!(f, "unterminated quote at byte offset {offset}")
            }
            Self::ColumnCountMismatch {
                row,
                expected,
                found,
            } => {
                write!(f, "row {row}: expected {expected} columns, found {found}")
            }
        }
    }
}

/// Observer interface for parse events.
///
/// Implementors can record metrics, logs, or counters; all methods default to
/// no-ops.
pub trait ParseObserver: Send + Sync {
    /// Called once per tolerated degradation.
    fn on_warning(&self, _warning: &ParseWarning) {}

    /// Called just before each chunk is handed to the sink.
    fn on_chunk(&self, _index: usize, _rows: usize) {}

    /// Called once when the scan finishes (including cancelled scans).
    fn on_complete(&self, _summary: &ParseSummary) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ParseObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ParseObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ParseObserver for CompositeObserver {
    fn on_warning(&self, warning: &ParseWarning) {
        for o in &self.observers {
            o.on_warning(warning);
        }
    }

    fn on_chunk(&self, index: usize, rows: usize) {
        for o in &self.observers {
            o.on_chunk(index, rows);
        }
    }

    fn on_complete(&self, summary: &ParseSummary) {
        for o in &self.observers {
            o.on_complete(summary);
        }
    }
}

/// Logs parse events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ParseObserver for StdErrObserver {
    fn on_warning(&self, warning: &ParseWarning) {
        eprintln!("[parse][warn] {warning}");
    }

    fn on_chunk(&self, index: usize, rows: usize) {
        eprintln!("[parse][chunk] index={index} rows={rows}");
    }

    fn on_complete(&self, summary: &ParseSummary) {
        eprintln!(
            "[parse][done] rows={} chunks={} cancelled={}",
            summary.rows, summary.chunks, summary.cancelled
        );
    }
}
