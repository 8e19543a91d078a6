//! # thermocal
//!
//! Calibration-curve core for time-stamped sensor logs: smooth noisy
//! readings with a trailing time window, detect when the signal settles
//! with a hysteresis state machine, turn the detected regime boundaries
//! into exclusion windows, and re-smooth with those exclusions applied.
//! The smoothed, exclusion-filtered output is what a downstream
//! clustering/regression step fits piecewise calibration segments to.
//!
//! The pipeline stages live in the member crates and exchange only plain
//! in-memory value types:
//!
//! - [`thermocal_core`]: `TimeSeries`, `DropRange`, errors, statistics
//! - [`thermocal_window`]: the trailing-window aggregator
//! - [`thermocal_stability`]: the regime detector and range synthesizer
//!
//! This crate re-exports all of them and adds [`refine`], the in-memory
//! feedback loop running aggregate → detect → synthesize → re-aggregate.

pub mod pipeline;

// Re-export workspace crates
pub use thermocal_core::{
    any_contains, mean, sample_stdev, Cell, DropRange, Error, NullProgress, ParsedRecord,
    ProgressObserver, Result, Row, TimeSeries, TimeSpan, PROGRESS_CADENCE,
};
pub use thermocal_stability::{
    DetectorConfig, DetectorState, DropRangeSynthesizer, Regime, RegimeBoundaries,
    StabilityDetector, SynthesizerConfig,
};
pub use thermocal_window::{Aggregates, ColumnPolicy, IgnoreColumns, WindowAggregator};

pub use pipeline::{refine, Refinement};
