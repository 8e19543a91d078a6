//! Exclusion time ranges
//!
//! A [`DropRange`] is a closed interval of time whose rows are excluded
//! from a pipeline stage's *output*. Membership is inclusive at both ends,
//! and either end may be unbounded ("beginning of time" / "end of time").
//! Overlapping ranges are never merged — a row is excluded when it falls
//! inside *any* range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed time interval with independently unbounded ends
///
/// `None` at `start` means the range extends back to the beginning of time,
/// `None` at `end` means it extends to the end of time. These are explicit
/// absent bounds, not sentinel timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DropRange {
    /// Range bounded on both ends
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Range from the beginning of time through `end`
    pub fn from_beginning(end: DateTime<Utc>) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Range from `start` through the end of time
    pub fn to_end(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Inclusive membership test
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| t >= s) && self.end.map_or(true, |e| t <= e)
    }
}

/// Whether any range in the set contains `t`
pub fn any_contains(ranges: &[DropRange], t: DateTime<Utc>) -> bool {
    ranges.iter().any(|r| r.contains(t))
}
