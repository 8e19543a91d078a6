//! Trailing-window aggregation
//!
//! For every row, the aggregator looks back over a fixed duration and
//! replaces the row's numeric cells with statistics over that window. The
//! window start index only ever moves forward as the anchor row advances
//! (two-pointer invariant), which keeps a full pass linear in the number
//! of row-cell visits rather than quadratic.
//!
//! Drop ranges suppress rows from the *output* only. A suppressed row
//! stays in the source series and still contributes to the windows of its
//! neighbors. The downstream calibration fit depends on this asymmetry;
//! do not "fix" it by deleting suppressed rows from the input.

use crate::policy::{Aggregates, ColumnPolicy, IgnoreColumns};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use thermocal_core::{
    any_contains, mean, sample_stdev, Cell, DropRange, Error, NullProgress, ProgressObserver,
    Result, Row, TimeSeries, PROGRESS_CADENCE,
};

/// Column-name suffix for emitted means
const MEAN_SUFFIX: &str = "_avg";
/// Column-name suffix for emitted sample stdevs
const STDEV_SUFFIX: &str = "_stdev";

/// Trailing-window aggregator over a [`TimeSeries`]
///
/// Configured once, then applied to any number of series. Construction is
/// infallible; the window duration is validated when a pass runs. The
/// whole configuration serializes (window as whole milliseconds), so a
/// tuned pass can be persisted and replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowAggregator {
    #[serde(with = "thermocal_core::duration_ms")]
    window: Duration,
    policy: ColumnPolicy,
    ignore: IgnoreColumns,
    augmented: bool,
    drop_ranges: Vec<DropRange>,
}

impl WindowAggregator {
    /// Aggregator with the given trailing window, mean-only policy, no
    /// ignored columns, plain output, and no exclusions
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            policy: ColumnPolicy::default(),
            ignore: IgnoreColumns::none(),
            augmented: false,
            drop_ranges: Vec::new(),
        }
    }

    /// Set the per-column aggregation policy
    pub fn with_policy(mut self, policy: ColumnPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the columns exempt from aggregation
    pub fn with_ignored(mut self, ignore: IgnoreColumns) -> Self {
        self.ignore = ignore;
        self
    }

    /// In augmented mode each emitted statistic is preceded by the row's
    /// own raw cell, and the header gains matching derived names
    pub fn augmented(mut self, augmented: bool) -> Self {
        self.augmented = augmented;
        self
    }

    /// Set the exclusion ranges applied on this pass
    pub fn with_drop_ranges(mut self, drop_ranges: Vec<DropRange>) -> Self {
        self.drop_ranges = drop_ranges;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn drop_ranges(&self) -> &[DropRange] {
        &self.drop_ranges
    }

    /// Run one aggregation pass
    pub fn aggregate(&self, series: &TimeSeries) -> Result<TimeSeries> {
        self.aggregate_with_progress(series, &mut NullProgress)
    }

    /// Run one aggregation pass, reporting row progress to `observer`
    pub fn aggregate_with_progress<P: ProgressObserver>(
        &self,
        series: &TimeSeries,
        observer: &mut P,
    ) -> Result<TimeSeries> {
        if self.window <= Duration::zero() {
            return Err(Error::InvalidParameter(
                "window duration must be positive".to_string(),
            ));
        }

        let rows = series.rows();
        let total = rows.len();
        let mut out = Vec::with_capacity(total);
        let mut start = 0usize;

        for (idx, row) in rows.iter().enumerate() {
            if idx % PROGRESS_CADENCE == 0 {
                observer.on_progress(idx, total);
            }

            // Suppressed from output, still present in `rows` for the
            // window scans of later anchors.
            if any_contains(&self.drop_ranges, row.timestamp) {
                continue;
            }

            let cutoff = row.timestamp - self.window;
            while start < total && rows[start].timestamp < cutoff {
                start += 1;
            }
            if start > idx {
                // Nothing left in range for this anchor (post-exclusion gap)
                log::debug!("empty window at row {idx}, dropping from output");
                continue;
            }
            let window = &rows[start..=idx];

            out.push(Row::new(row.timestamp, self.emit_row(row, window)));
        }
        observer.on_progress(total, total);

        let header = series.header().map(|names| self.emit_header(names));
        Ok(TimeSeries::new(header, out))
    }

    /// Build the output cells for one anchor row over its window
    fn emit_row(&self, row: &Row, window: &[Row]) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(row.cells.len());
        for (col, raw) in row.cells.iter().enumerate() {
            let aggregates = self.policy.aggregates_for(col);
            if self.ignore.contains(col) || aggregates.is_empty() {
                cells.push(raw.clone());
                continue;
            }

            let samples: Vec<f64> = window.iter().filter_map(|r| r.number(col)).collect();
            for aggregate in [Aggregates::MEAN, Aggregates::STDEV] {
                if !aggregates.contains(aggregate) {
                    continue;
                }
                if self.augmented {
                    cells.push(raw.clone());
                }
                let stat = if aggregate == Aggregates::MEAN {
                    mean(&samples)
                } else {
                    sample_stdev(&samples)
                };
                cells.push(stat.map_or(Cell::Missing, Cell::Number));
            }
        }
        cells
    }

    /// Rewrite the header to match the emitted field layout
    fn emit_header(&self, names: &[String]) -> Vec<String> {
        if !self.augmented {
            // Plain mode passes the header through unchanged
            return names.to_vec();
        }
        let mut out = Vec::with_capacity(names.len());
        for (col, name) in names.iter().enumerate() {
            let aggregates = self.policy.aggregates_for(col);
            if self.ignore.contains(col) || aggregates.is_empty() {
                out.push(name.clone());
                continue;
            }
            for (aggregate, suffix) in [
                (Aggregates::MEAN, MEAN_SUFFIX),
                (Aggregates::STDEV, STDEV_SUFFIX),
            ] {
                if aggregates.contains(aggregate) {
                    out.push(name.clone());
                    out.push(format!("{name}{suffix}"));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 4, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn series(points: &[(i64, f64)]) -> TimeSeries {
        TimeSeries::new(
            None,
            points
                .iter()
                .map(|&(m, v)| Row::new(ts(m), vec![Cell::Number(v)]))
                .collect(),
        )
    }

    #[test]
    fn test_rejects_non_positive_window() {
        let aggregator = WindowAggregator::new(Duration::zero());
        let err = aggregator.aggregate(&series(&[(0, 1.0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_mean_over_trailing_window() {
        let aggregator = WindowAggregator::new(Duration::minutes(10));
        let out = aggregator
            .aggregate(&series(&[(0, 1.0), (5, 3.0), (20, 10.0)]))
            .unwrap();
        assert_eq!(out.len(), 3);
        // Second row averages rows at t=0 and t=5
        assert_relative_eq!(out.rows()[1].number(0).unwrap(), 2.0);
        // Third row's window excludes everything older than t=10
        assert_relative_eq!(out.rows()[2].number(0).unwrap(), 10.0);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        // A row exactly `window` old is still inside the window
        let aggregator = WindowAggregator::new(Duration::minutes(10));
        let out = aggregator.aggregate(&series(&[(0, 2.0), (10, 4.0)])).unwrap();
        assert_relative_eq!(out.rows()[1].number(0).unwrap(), 3.0);
    }

    #[test]
    fn test_stdev_policy_emits_sample_statistic() {
        let aggregator = WindowAggregator::new(Duration::minutes(10))
            .with_policy(ColumnPolicy::uniform(Aggregates::STDEV));
        let out = aggregator
            .aggregate(&series(&[(0, 10.0), (1, 12.0), (2, 14.0)]))
            .unwrap();
        assert_relative_eq!(out.rows()[2].number(0).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stdev_of_single_sample_is_nan() {
        let aggregator = WindowAggregator::new(Duration::minutes(1))
            .with_policy(ColumnPolicy::uniform(Aggregates::STDEV));
        let out = aggregator.aggregate(&series(&[(0, 5.0)])).unwrap();
        let stat = out.rows()[0].number(0).unwrap();
        assert!(stat.is_nan());
    }

    #[test]
    fn test_text_cells_are_excluded_from_samples() {
        let rows = vec![
            Row::new(ts(0), vec![Cell::Number(1.0)]),
            Row::new(ts(1), vec![Cell::Text("fault".into())]),
            Row::new(ts(2), vec![Cell::Number(3.0)]),
        ];
        let aggregator = WindowAggregator::new(Duration::minutes(10));
        let out = aggregator.aggregate(&TimeSeries::new(None, rows)).unwrap();
        assert_relative_eq!(out.rows()[2].number(0).unwrap(), 2.0);
    }

    #[test]
    fn test_no_numeric_data_emits_missing() {
        let rows = vec![Row::new(ts(0), vec![Cell::Text("n/a".into())])];
        let aggregator = WindowAggregator::new(Duration::minutes(10));
        let out = aggregator.aggregate(&TimeSeries::new(None, rows)).unwrap();
        assert_eq!(out.rows()[0].cells[0], Cell::Missing);
    }

    #[test]
    fn test_ignored_column_passes_raw_value() {
        let rows = vec![
            Row::new(ts(0), vec![Cell::Number(1.0), Cell::Number(100.0)]),
            Row::new(ts(1), vec![Cell::Number(3.0), Cell::Number(200.0)]),
        ];
        let aggregator = WindowAggregator::new(Duration::minutes(10))
            .with_ignored(IgnoreColumns::from_indices([1]));
        let out = aggregator.aggregate(&TimeSeries::new(None, rows)).unwrap();
        assert_relative_eq!(out.rows()[1].number(0).unwrap(), 2.0);
        assert_relative_eq!(out.rows()[1].number(1).unwrap(), 200.0);
    }

    #[test]
    fn test_drop_range_suppresses_but_still_feeds_neighbors() {
        // The row at t=5 is excluded from output, yet the t=8 row's
        // window still averages over it.
        let aggregator = WindowAggregator::new(Duration::minutes(10))
            .with_drop_ranges(vec![DropRange::between(ts(4), ts(6))]);
        let out = aggregator
            .aggregate(&series(&[(0, 1.0), (5, 7.0), (8, 4.0)]))
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[1].timestamp, ts(8));
        assert_relative_eq!(out.rows()[1].number(0).unwrap(), 4.0);
    }

    #[test]
    fn test_augmented_emits_raw_before_each_statistic() {
        let header = Some(vec!["temp".to_string()]);
        let rows = vec![
            Row::new(ts(0), vec![Cell::Number(10.0)]),
            Row::new(ts(1), vec![Cell::Number(12.0)]),
            Row::new(ts(2), vec![Cell::Number(14.0)]),
        ];
        let aggregator = WindowAggregator::new(Duration::minutes(10))
            .with_policy(ColumnPolicy::uniform(Aggregates::MEAN | Aggregates::STDEV))
            .augmented(true);
        let out = aggregator
            .aggregate(&TimeSeries::new(header, rows))
            .unwrap();

        assert_eq!(
            out.header().unwrap(),
            &[
                "temp".to_string(),
                "temp_avg".to_string(),
                "temp".to_string(),
                "temp_stdev".to_string(),
            ]
        );
        let last = &out.rows()[2];
        assert_eq!(last.cells[0], Cell::Number(14.0));
        assert_relative_eq!(last.number(1).unwrap(), 12.0);
        assert_eq!(last.cells[2], Cell::Number(14.0));
        assert_relative_eq!(last.number(3).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plain_mode_header_unchanged() {
        let header = Some(vec!["temp".to_string(), "note".to_string()]);
        let rows = vec![Row::new(
            ts(0),
            vec![Cell::Number(1.0), Cell::Text("ok".into())],
        )];
        let aggregator = WindowAggregator::new(Duration::minutes(10))
            .with_ignored(IgnoreColumns::from_indices([1]));
        let out = aggregator
            .aggregate(&TimeSeries::new(header.clone(), rows))
            .unwrap();
        assert_eq!(out.header().unwrap(), header.as_deref().unwrap());
    }

    struct Recorder(Vec<(usize, usize)>);

    impl ProgressObserver for Recorder {
        fn on_progress(&mut self, done: usize, total: usize) {
            self.0.push((done, total));
        }
    }

    #[test]
    fn test_progress_reports_at_cadence() {
        let points: Vec<(i64, f64)> = (0..250).map(|i| (i, i as f64)).collect();
        let mut observer = Recorder(Vec::new());
        let aggregator = WindowAggregator::new(Duration::minutes(10));
        aggregator
            .aggregate_with_progress(&series(&points), &mut observer)
            .unwrap();
        assert_eq!(
            observer.0,
            vec![(0, 250), (100, 250), (200, 250), (250, 250)]
        );
    }

    #[test]
    fn test_configuration_serialize_round_trip() {
        let aggregator = WindowAggregator::new(Duration::minutes(10))
            .with_policy(ColumnPolicy::uniform(Aggregates::STDEV))
            .with_ignored(IgnoreColumns::from_indices([2]))
            .augmented(true)
            .with_drop_ranges(vec![DropRange::between(ts(5), ts(15))]);
        let json = serde_json::to_string(&aggregator).unwrap();
        assert!(json.contains(r#""window":600000"#));
        let back: WindowAggregator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, aggregator);
    }
}
