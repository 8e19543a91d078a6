//! Exclusion-window synthesis from regime boundaries
//!
//! Bridges detector output back into the aggregator: each boundary becomes
//! a [`DropRange`] sized proportionally to the gaps between its neighbors,
//! so the refinement pass skips the data surrounding every regime change.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thermocal_core::{DropRange, Error, Result, TimeSpan};

/// Sizing knobs for synthesized exclusion windows
///
/// Serializes with `lag` as whole milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// Fraction of the preceding gap excluded before a boundary, in `[0, 1)`
    pub percent_before: f64,
    /// Fraction of the following gap excluded after a boundary, in `[0, 1)`
    pub percent_after: f64,
    /// Backward shift applied to every boundary first, compensating for
    /// the coarse window's inherent reporting delay
    #[serde(with = "thermocal_core::duration_ms")]
    pub lag: Duration,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            percent_before: 0.25,
            percent_after: 0.35,
            lag: Duration::zero(),
        }
    }
}

impl SynthesizerConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, fraction) in [
            ("percent_before", self.percent_before),
            ("percent_after", self.percent_after),
        ] {
            if !(0.0..1.0).contains(&fraction) {
                return Err(Error::invalid_fraction(name, fraction));
            }
        }
        if self.lag < Duration::zero() {
            return Err(Error::negative_duration("lag"));
        }
        Ok(())
    }
}

/// Turns an ordered boundary sequence into exclusion ranges
#[derive(Debug, Clone)]
pub struct DropRangeSynthesizer {
    config: SynthesizerConfig,
}

impl DropRangeSynthesizer {
    /// Create a synthesizer, failing fast on an invalid configuration
    pub fn new(config: SynthesizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Synthesize one range per boundary
    ///
    /// The first range is open at the beginning of time, the last at the
    /// end of time; interior ranges are sized from both neighbor gaps. A
    /// lone boundary takes the first-boundary rule with the series end
    /// standing in for the missing right neighbor. `span.earliest` is part
    /// of the contract but unused: the head range is unbounded anyway.
    ///
    /// The neighbor-gap formulas assume `boundaries` is ascending. Note
    /// that [`RegimeBoundaries::ordered`] appends the closing boundary
    /// last, which can precede an earlier settlement point when a trace
    /// settles more than once; interior ranges computed from such a
    /// sequence get negative gaps on one side and collapse accordingly.
    ///
    /// [`RegimeBoundaries::ordered`]: crate::RegimeBoundaries::ordered
    pub fn synthesize(
        &self,
        boundaries: &[DateTime<Utc>],
        span: TimeSpan,
    ) -> Vec<DropRange> {
        let shifted: Vec<DateTime<Utc>> =
            boundaries.iter().map(|&b| b - self.config.lag).collect();
        let last = shifted.len().wrapping_sub(1);

        shifted
            .iter()
            .enumerate()
            .map(|(k, &b)| {
                if k == 0 {
                    let next = if shifted.len() > 1 { shifted[1] } else { span.latest };
                    DropRange::from_beginning(b + scale(next - b, self.config.percent_after))
                } else if k == last {
                    DropRange::to_end(b - scale(span.latest - b, self.config.percent_before))
                } else {
                    DropRange::between(
                        b - scale(b - shifted[k - 1], self.config.percent_before),
                        b + scale(shifted[k + 1] - b, self.config.percent_after),
                    )
                }
            })
            .collect()
    }

    /// Synthesize, then append caller-supplied ranges verbatim
    ///
    /// No merging: consumers treat membership in any range as exclusion.
    pub fn synthesize_with_manual(
        &self,
        boundaries: &[DateTime<Utc>],
        span: TimeSpan,
        manual: &[DropRange],
    ) -> Vec<DropRange> {
        let mut ranges = self.synthesize(boundaries, span);
        ranges.extend_from_slice(manual);
        ranges
    }
}

/// Fraction of a duration, rounded to whole milliseconds
fn scale(gap: Duration, fraction: f64) -> Duration {
    Duration::milliseconds((gap.num_milliseconds() as f64 * fraction).round() as i64)
}
