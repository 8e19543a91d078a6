//! Timestamped row/series value types
//!
//! A [`TimeSeries`] is the unit of exchange between every pipeline stage:
//! the tabular reader produces one, each aggregation pass consumes and
//! produces one, and the stability detector reads one column out of one.
//! Components treat their input series as immutable; each stage builds a
//! fresh output series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value cell in a row
///
/// Non-numeric source values are preserved verbatim as [`Cell::Text`] and
/// excluded from aggregation. [`Cell::Missing`] is the "no data" marker an
/// aggregation emits when a window holds no numeric samples for a column;
/// it is distinct from zero and from any text value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// A finite (or NaN, for undefined statistics) numeric value
    Number(f64),
    /// An opaque non-numeric value, passed through untouched
    Text(String),
    /// No data available for this column
    Missing,
}

impl Cell {
    /// Parse a raw text field the way the tabular reader does: finite
    /// numbers become [`Cell::Number`], everything else stays text.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(raw.to_string()),
        }
    }

    /// Numeric view of this cell, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this cell participates in aggregation
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Number(_))
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Missing => Ok(()),
        }
    }
}

/// One observation: a timestamp plus its value cells
///
/// Column indices are 0-based over `cells`; the timestamp is a typed field,
/// not a cell (the source convention "column 0 is the timestamp" becomes
/// structure here rather than an index every caller must remember).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub timestamp: DateTime<Utc>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(timestamp: DateTime<Utc>, cells: Vec<Cell>) -> Self {
        Self { timestamp, cells }
    }

    /// Numeric value of a column, if present and numeric
    pub fn number(&self, column: usize) -> Option<f64> {
        self.cells.get(column).and_then(Cell::as_number)
    }
}

/// A record as handed over by the tabular reader, before timestamp
/// validation: `timestamp` is `None` when the upstream parse failed.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub timestamp: Option<DateTime<Utc>>,
    pub cells: Vec<Cell>,
}

/// The overall time extent of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

/// An ordered sequence of timestamped rows with an optional header
///
/// Invariant: row timestamps are non-decreasing. Callers are responsible
/// for supplying ordered input; the trailing-window algorithms are only
/// correct under this invariant and do not check it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    header: Option<Vec<String>>,
    rows: Vec<Row>,
}

impl TimeSeries {
    pub fn new(header: Option<Vec<String>>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// Build a series from reader output, dropping records whose timestamp
    /// failed to parse upstream. Dropped records are logged, never fatal —
    /// a malformed timestamp must not reach the window algorithm.
    pub fn from_parsed(
        header: Option<Vec<String>>,
        records: impl IntoIterator<Item = ParsedRecord>,
    ) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, record)| match record.timestamp {
                Some(timestamp) => Some(Row::new(timestamp, record.cells)),
                None => {
                    log::warn!("dropping record {idx}: first column is not a valid timestamp");
                    None
                }
            })
            .collect();
        Self { header, rows }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extent from first to last row timestamp, `None` for an empty series
    pub fn span(&self) -> Option<TimeSpan> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some(TimeSpan {
                earliest: first.timestamp,
                latest: last.timestamp,
            }),
            _ => None,
        }
    }

    /// Iterate `(timestamp, value)` over one column, skipping rows where
    /// that column is not numeric
    pub fn numeric_column(
        &self,
        column: usize,
    ) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.rows
            .iter()
            .filter_map(move |row| row.number(column).map(|v| (row.timestamp, v)))
    }
}
