//! Spike detection.

use super::sample::SampleSeries;

/// CPU value above which a sample counts as a spike.
pub const DEFAULT_SPIKE_THRESHOLD: f64 = 3.0;

/// Return the samples whose cpu is strictly greater than `threshold`.
pub fn detect(series: &SampleSeries, threshold: f64) -> SampleSeries {
    series.filter(|s| s.cpu > threshold)
}
