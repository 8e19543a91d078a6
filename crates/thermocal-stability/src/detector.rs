//! Hysteresis-based stability detection
//!
//! Classifies a dispersion signal (typically a windowed stdev column) into
//! stable and changing regimes using a four-state machine with duration
//! hysteresis, and reports the timestamps at which the signal settles.
//!
//! The per-row logic is a pure transition function on an explicit
//! [`DetectorState`] record: `(state, timestamp, value) -> (state, boundary?)`.
//! No hidden accumulator state, which keeps the machine testable row by row.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thermocal_core::{Error, Result, TimeSeries};

/// Thresholds and durations governing the state machine
///
/// `above_threshold` must exceed `below_threshold`; the band between them
/// is hysteresis slack where no transition condition fires. All durations
/// must be non-negative. Serializes with durations as whole milliseconds,
/// so a tuned configuration can be persisted between pipeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Dispersion above this value counts as "changing"
    pub above_threshold: f64,
    /// Dispersion below this value counts as "settled"
    pub below_threshold: f64,
    /// Time the signal must sit above threshold before entering `Changing`
    #[serde(with = "thermocal_core::duration_ms")]
    pub required_above: Duration,
    /// Time the signal must sit below threshold before a boundary is emitted
    #[serde(with = "thermocal_core::duration_ms")]
    pub required_below: Duration,
    /// Maximum dwell time in `Changing` before reverting to `Above`
    #[serde(with = "thermocal_core::duration_ms")]
    pub changing_limit: Duration,
    /// Suppress detection of stability the stream starts in
    pub ignore_initial_stability: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            above_threshold: 0.09,
            below_threshold: 0.05,
            required_above: Duration::minutes(10),
            required_below: Duration::minutes(10),
            changing_limit: Duration::minutes(60),
            ignore_initial_stability: false,
        }
    }
}

impl DetectorConfig {
    /// Fail fast on configurations that would produce meaningless boundaries
    pub fn validate(&self) -> Result<()> {
        if !(self.above_threshold > self.below_threshold) {
            return Err(Error::InvalidParameter(format!(
                "above_threshold {} must exceed below_threshold {}",
                self.above_threshold, self.below_threshold
            )));
        }
        for (name, duration) in [
            ("required_above", self.required_above),
            ("required_below", self.required_below),
            ("changing_limit", self.changing_limit),
        ] {
            if duration < Duration::zero() {
                return Err(Error::negative_duration(name));
            }
        }
        Ok(())
    }
}

/// The four regimes of the hysteresis machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Dispersion is (or is presumed) elevated; the initial state
    Above,
    /// Sustained elevation confirmed; tracking the dispersion peak
    Changing,
    /// Dispersion dipped below threshold, waiting out `required_below`
    MaybeBelow,
    /// Settled: the signal has been below threshold long enough
    Below,
}

/// Running maximum of the dispersion signal and when it occurred
#[derive(Debug, Clone, Copy, PartialEq)]
struct Peak {
    value: f64,
    at: DateTime<Utc>,
}

/// Explicit per-run state record, threaded through [`StabilityDetector::step`]
///
/// Created at stream start in [`Regime::Above`], mutated row by row, never
/// persisted beyond one detector run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorState {
    regime: Regime,
    last_change: DateTime<Utc>,
    peak: Option<Peak>,
    pending_close: Option<DateTime<Utc>>,
}

impl DetectorState {
    /// State at stream start: `Above`, clock anchored at the first sample
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            regime: Regime::Above,
            last_change: start,
            peak: None,
            pending_close: None,
        }
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn last_change(&self) -> DateTime<Utc> {
        self.last_change
    }

    /// Timestamp of the most recent `Below` → `Above` transition
    pub fn pending_close(&self) -> Option<DateTime<Utc>> {
        self.pending_close
    }
}

/// Ordered regime boundaries produced by one detector run
///
/// `points` are settlement boundaries, oldest first; each is the timestamp
/// of the dispersion peak preceding the settlement, a better proxy for the
/// true end of instability than the threshold-crossing moment. `closing`
/// is the final return to instability — absent when the series ends still
/// settled, and that absence is meaningful, not a sentinel timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegimeBoundaries {
    points: Vec<DateTime<Utc>>,
    closing: Option<DateTime<Utc>>,
}

impl RegimeBoundaries {
    pub fn new(points: Vec<DateTime<Utc>>, closing: Option<DateTime<Utc>>) -> Self {
        Self { points, closing }
    }

    /// Settlement boundaries, oldest first
    pub fn points(&self) -> &[DateTime<Utc>] {
        &self.points
    }

    /// Final return to instability, if the series ever returned
    pub fn closing(&self) -> Option<DateTime<Utc>> {
        self.closing
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.closing.is_none()
    }

    /// All boundaries in emission order, the closing boundary last when
    /// present
    ///
    /// This is append order, not timestamp order: the closing boundary is
    /// the final return to instability, which precedes any settlement
    /// point detected after it. A trace that settles, destabilizes, and
    /// settles again yields `[peak1, peak2, close]` with `close < peak2`.
    pub fn ordered(&self) -> Vec<DateTime<Utc>> {
        let mut all = self.points.clone();
        all.extend(self.closing);
        all
    }
}

/// Four-state hysteresis detector over `(timestamp, dispersion)` samples
#[derive(Debug, Clone)]
pub struct StabilityDetector {
    config: DetectorConfig,
}

impl StabilityDetector {
    /// Create a detector, failing fast on an invalid configuration
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Advance the machine by one sample
    ///
    /// Pure with respect to its inputs: the same `(state, t, value)` always
    /// yields the same successor state and optional boundary. Threshold
    /// comparisons are strict; a value equal to either threshold falls into
    /// the between-thresholds branch of the active state. Any fired
    /// transition, including a same-state clock reset, re-anchors
    /// `last_change` at `t`.
    pub fn step(
        &self,
        mut state: DetectorState,
        t: DateTime<Utc>,
        value: f64,
    ) -> (DetectorState, Option<DateTime<Utc>>) {
        // The peak re-arms on the first sample after it was cleared, in
        // whatever regime the machine is in.
        if state.peak.is_none() {
            state.peak = Some(Peak { value, at: t });
        }

        let above = value > self.config.above_threshold;
        let below = value < self.config.below_threshold;
        let previous = state.regime;
        let mut changed = false;
        let mut boundary = None;

        match state.regime {
            Regime::Above => {
                if below && !self.config.ignore_initial_stability {
                    state.regime = Regime::MaybeBelow;
                    changed = true;
                } else if above {
                    // Waiting out required_above; the clock keeps running
                    if t - state.last_change >= self.config.required_above {
                        state.regime = Regime::Changing;
                        changed = true;
                    }
                } else {
                    // Between thresholds still resets the clock
                    changed = true;
                }
            }
            Regime::Changing => {
                if let Some(peak) = state.peak.as_mut() {
                    if value > peak.value {
                        *peak = Peak { value, at: t };
                    }
                }
                if below {
                    state.regime = Regime::MaybeBelow;
                    changed = true;
                } else if t - state.last_change >= self.config.changing_limit {
                    state.regime = Regime::Above;
                    state.peak = None;
                    changed = true;
                }
            }
            Regime::MaybeBelow => {
                if above {
                    state.regime = Regime::Above;
                    changed = true;
                } else if t - state.last_change >= self.config.required_below {
                    state.regime = Regime::Below;
                    boundary = state.peak.map(|p| p.at);
                    state.peak = None;
                    changed = true;
                }
            }
            Regime::Below => {
                if above {
                    state.regime = Regime::Above;
                    state.pending_close = Some(t);
                    changed = true;
                }
            }
        }

        if changed {
            state.last_change = t;
            if state.regime != previous {
                log::debug!("state changed from {previous:?} to {:?} at {t}", state.regime);
            }
        }
        (state, boundary)
    }

    /// Run the machine over `(timestamp, value)` samples
    ///
    /// Non-finite values (NaN dispersion from single-sample windows) are
    /// skipped, not failed.
    pub fn detect(
        &self,
        samples: impl IntoIterator<Item = (DateTime<Utc>, f64)>,
    ) -> RegimeBoundaries {
        let mut state: Option<DetectorState> = None;
        let mut points = Vec::new();

        for (t, value) in samples {
            if !value.is_finite() {
                continue;
            }
            let current = state.unwrap_or_else(|| DetectorState::new(t));
            let (next, boundary) = self.step(current, t, value);
            points.extend(boundary);
            state = Some(next);
        }

        RegimeBoundaries {
            points,
            closing: state.and_then(|s| s.pending_close),
        }
    }

    /// Run the machine over one column of a series, skipping rows where
    /// that column is not numeric
    pub fn detect_series(&self, series: &TimeSeries, column: usize) -> RegimeBoundaries {
        self.detect(series.numeric_column(column))
    }
}
