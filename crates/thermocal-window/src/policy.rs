//! Aggregation configuration: which statistic(s) each column gets
//!
//! The source tooling selected aggregation functions by string name per
//! column. Here the choice is a closed flag set resolved once at
//! configuration time, never per row.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

bitflags! {
    /// Statistics emitted for a column; empty means passthrough
    ///
    /// Serde impls come from bitflags' `serde` feature, serializing as a
    /// flag-name string in human-readable formats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Aggregates: u8 {
        const MEAN = 1 << 0;
        const STDEV = 1 << 1;
    }
}

/// Per-column aggregation policy: a default set plus per-column overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPolicy {
    default: Aggregates,
    overrides: BTreeMap<usize, Aggregates>,
}

impl ColumnPolicy {
    /// Same aggregate set for every column
    pub fn uniform(default: Aggregates) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// Override the aggregate set for one column
    pub fn with_column(mut self, column: usize, aggregates: Aggregates) -> Self {
        self.overrides.insert(column, aggregates);
        self
    }

    pub fn aggregates_for(&self, column: usize) -> Aggregates {
        self.overrides.get(&column).copied().unwrap_or(self.default)
    }
}

impl Default for ColumnPolicy {
    fn default() -> Self {
        Self::uniform(Aggregates::MEAN)
    }
}

/// Columns exempt from aggregation (always raw passthrough)
///
/// An enumerated index set, optionally open-ended: with the trailer set,
/// every column past the highest enumerated index is ignored too. The
/// trailer exists to mass-exclude trailing metadata columns without
/// enumerating them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IgnoreColumns {
    indices: BTreeSet<usize>,
    and_rest: bool,
}

impl IgnoreColumns {
    /// Ignore nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            and_rest: false,
        }
    }

    /// Also ignore every column after the highest enumerated index
    /// (all columns, if none are enumerated)
    pub fn and_rest(mut self) -> Self {
        self.and_rest = true;
        self
    }

    pub fn contains(&self, column: usize) -> bool {
        if self.indices.contains(&column) {
            return true;
        }
        self.and_rest
            && self
                .indices
                .iter()
                .next_back()
                .map_or(true, |&highest| column > highest)
    }
}
