//! The two-pass refinement loop
//!
//! Wires the stages together as sequential in-memory batch steps:
//! fine smoothing, coarse dispersion, regime detection, exclusion-window
//! synthesis, and a second fine pass with the exclusions applied. Each
//! stage reads its input and builds fresh output, so identical input and
//! configuration always reproduce identical boundaries and aggregates.

use thermocal_core::{DropRange, Error, Result, TimeSeries};
use thermocal_stability::{DropRangeSynthesizer, RegimeBoundaries, StabilityDetector};
use thermocal_window::WindowAggregator;

/// Output of one refinement run
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    /// The re-smoothed series with unstable periods excluded
    pub series: TimeSeries,
    /// Regime boundaries found on the dispersion signal
    pub boundaries: RegimeBoundaries,
    /// Exclusion ranges applied on the second pass (synthesized ranges
    /// first, then any ranges the fine aggregator already carried)
    pub drop_ranges: Vec<DropRange>,
}

/// Run the full loop over a raw series
///
/// `dispersion_column` is the column of the *coarse* aggregation output
/// that feeds the detector (typically the windowed stdev of the
/// temperature channel). Fails on an empty input series; per-row
/// recoveries (malformed rows, empty windows, missing data) never fail
/// the run.
pub fn refine(
    raw: &TimeSeries,
    fine: &WindowAggregator,
    coarse: &WindowAggregator,
    dispersion_column: usize,
    detector: &StabilityDetector,
    synthesizer: &DropRangeSynthesizer,
) -> Result<Refinement> {
    let span = raw.span().ok_or_else(Error::empty_input)?;

    let smoothed = fine.aggregate(raw)?;
    let dispersion = coarse.aggregate(&smoothed)?;
    let boundaries = detector.detect_series(&dispersion, dispersion_column);
    let drop_ranges =
        synthesizer.synthesize_with_manual(&boundaries.ordered(), span, fine.drop_ranges());

    let series = fine
        .clone()
        .with_drop_ranges(drop_ranges.clone())
        .aggregate(raw)?;

    Ok(Refinement {
        series,
        boundaries,
        drop_ranges,
    })
}
