//! Summary statistics and color banding for the stats panel.

use super::sample::SampleSeries;
use crate::error::EmptySeriesError;

/// Fraction of the observed max above which a value is critical.
const CRITICAL_RATIO: f64 = 0.85;
/// Fraction of the observed max above which a value is a warning.
const WARNING_RATIO: f64 = 0.5;

/// Color band for a metric value relative to the series max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorLevel {
    Normal,
    Warning,
    Critical,
}

impl ColorLevel {
    /// Band `value` against `max`.
    pub fn of(value: f64, max: f64) -> Self {
        if value > max * CRITICAL_RATIO {
            ColorLevel::Critical
        } else if value > max * WARNING_RATIO {
            ColorLevel::Warning
        } else {
            ColorLevel::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorLevel::Normal => "normal",
            ColorLevel::Warning => "warning",
            ColorLevel::Critical => "critical",
        }
    }
}

/// Latest/mean/max for cpu and memory over one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub latest_cpu: f64,
    pub latest_memory: f64,
    pub avg_cpu: f64,
    pub max_cpu: f64,
    pub avg_memory: f64,
    pub max_memory: f64,
    pub cpu_level: ColorLevel,
    pub memory_level: ColorLevel,
}

/// Summarize a series.
///
/// Levels compare each metric's latest value to that metric's own max.
pub fn summarize(series: &SampleSeries) -> Result<Stats, EmptySeriesError> {
    let latest = series.last().ok_or(EmptySeriesError)?;
    let n = series.len() as f64;

    let (cpu_sum, memory_sum, max_cpu, max_memory) = series.iter().fold(
        (0.0, 0.0, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(cs, ms, mc, mm), s| (cs + s.cpu, ms + s.memory, mc.max(s.cpu), mm.max(s.memory)),
    );

    Ok(Stats {
        latest_cpu: latest.cpu,
        latest_memory: latest.memory,
        avg_cpu: cpu_sum / n,
        max_cpu,
        avg_memory: memory_sum / n,
        max_memory,
        cpu_level: ColorLevel::of(latest.cpu, max_cpu),
        memory_level: ColorLevel::of(latest.memory, max_memory),
    })
}
