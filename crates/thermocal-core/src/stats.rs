//! Scalar statistics over window samples
//!
//! Only the two aggregates the smoothing passes emit. Stdev is the sample
//! statistic (Bessel-corrected, divide by n−1) throughout the pipeline.

/// Arithmetic mean, `None` for an empty sample
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample standard deviation (n−1 denominator)
///
/// `None` for an empty sample; a single sample yields `Some(NaN)` — the
/// statistic is undefined there and must never be coerced to zero.
pub fn sample_stdev(samples: &[f64]) -> Option<f64> {
    match samples.len() {
        0 => None,
        1 => Some(f64::NAN),
        n => {
            let m = samples.iter().sum::<f64>() / n as f64;
            let ss: f64 = samples.iter().map(|x| (x - m) * (x - m)).sum();
            Some((ss / (n - 1) as f64).sqrt())
        }
    }
}
