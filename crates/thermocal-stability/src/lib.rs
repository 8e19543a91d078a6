//! Regime detection and exclusion-window synthesis
//!
//! The decision stage of the calibration pipeline. A windowed dispersion
//! signal goes in; out come the timestamps at which the sensor settled
//! ([`RegimeBoundaries`]) and, from those, the exclusion windows
//! ([`DropRange`](thermocal_core::DropRange)) the refinement aggregation
//! pass applies.
//!
//! Detection is hysteresis-based: the signal must hold above the upper
//! threshold for a configured duration before the machine accepts that a
//! change is underway, and hold below the lower threshold for another
//! duration before the regime counts as settled. Values in the band
//! between the thresholds extend whatever phase is active.

pub mod detector;
pub mod synth;

// Re-exports
pub use detector::{
    DetectorConfig, DetectorState, Regime, RegimeBoundaries, StabilityDetector,
};
pub use synth::{DropRangeSynthesizer, SynthesizerConfig};
