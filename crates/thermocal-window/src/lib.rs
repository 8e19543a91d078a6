//! Trailing-window aggregation for timestamped sensor series
//!
//! The smoothing stage of the calibration pipeline: every row of a
//! [`TimeSeries`](thermocal_core::TimeSeries) is replaced by statistics
//! computed over a fixed trailing time window, with per-column policies,
//! ignore lists, and exclusion ranges fed back from the stability detector.
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use thermocal_core::{Cell, Row, TimeSeries};
//! use thermocal_window::{Aggregates, ColumnPolicy, WindowAggregator};
//!
//! let t0 = Utc.with_ymd_and_hms(2023, 4, 1, 12, 0, 0).unwrap();
//! let series = TimeSeries::new(
//!     None,
//!     (0..6)
//!         .map(|i| Row::new(t0 + Duration::minutes(i), vec![Cell::Number(i as f64)]))
//!         .collect(),
//! );
//!
//! let smoothed = WindowAggregator::new(Duration::minutes(10))
//!     .with_policy(ColumnPolicy::uniform(Aggregates::MEAN))
//!     .aggregate(&series)
//!     .unwrap();
//! assert_eq!(smoothed.len(), 6);
//! ```

pub mod aggregator;
pub mod policy;

// Re-exports
pub use aggregator::WindowAggregator;
pub use policy::{Aggregates, ColumnPolicy, IgnoreColumns};
