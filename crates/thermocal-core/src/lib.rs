//! Core value types for the thermocal calibration pipeline
//!
//! Every pipeline stage exchanges the plain in-memory types defined here:
//! [`TimeSeries`] (ordered timestamped rows with typed cells), [`DropRange`]
//! (closed exclusion intervals with optionally unbounded ends), and the
//! scalar statistics both smoothing passes emit. Once produced, a series or
//! range set is treated as immutable — a component reads, never mutates,
//! its input. That, plus the absence of any hidden state, is what makes the
//! aggregate → detect → synthesize → re-aggregate feedback loop
//! byte-for-byte reproducible.

pub mod duration_ms;
pub mod error;
pub mod progress;
pub mod ranges;
pub mod series;
pub mod stats;

// Re-exports
pub use error::{Error, Result};
pub use progress::{NullProgress, ProgressObserver, PROGRESS_CADENCE};
pub use ranges::{any_contains, DropRange};
pub use series::{Cell, ParsedRecord, Row, TimeSeries, TimeSpan};
pub use stats::{mean, sample_stdev};
