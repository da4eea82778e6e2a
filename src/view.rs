//! View model for one refresh cycle.
//!
//! [`render`] is the whole of the dashboard's business logic: filter, detect
//! spikes, summarize. The ratatui layer only draws the resulting
//! [`ViewModel`].

use chrono::{DateTime, SecondsFormat, Utc};

use crate::data::{detect, summarize, DateRange, SampleSeries, Stats};

/// Placeholder for values that cannot be shown on an empty range.
pub const NO_DATA: &str = "no data";

/// Everything the dashboard displays after a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Samples inside the active date range.
    pub series: SampleSeries,
    /// Spikes among `series`.
    pub spikes: SampleSeries,
    /// None when `series` is empty.
    pub stats: Option<Stats>,
    /// Range the series was filtered with.
    pub range: DateRange,
    pub threshold: f64,
    /// Sample count before filtering.
    pub total_samples: usize,
}

/// Build the view model for a fetched series.
pub fn render(fetched: &SampleSeries, range: &DateRange, threshold: f64) -> ViewModel {
    let series = range.apply(fetched);
    let spikes = detect(&series, threshold);
    let stats = summarize(&series).ok();

    ViewModel {
        series,
        spikes,
        stats,
        range: *range,
        threshold,
        total_samples: fetched.len(),
    }
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn spike_count(&self) -> usize {
        self.spikes.len()
    }

    pub fn last_spike(&self) -> Option<DateTime<Utc>> {
        self.spikes.last().map(|s| s.time)
    }

    /// "Spike Count: N | Last Spike: <time or None>"
    pub fn spike_info(&self) -> String {
        let last = self
            .last_spike()
            .map(format_time)
            .unwrap_or_else(|| "None".to_string());
        format!("Spike Count: {} | Last Spike: {}", self.spike_count(), last)
    }

    /// Latest (cpu, memory) as display strings.
    pub fn latest_values(&self) -> (String, String) {
        match &self.stats {
            Some(s) => (s.latest_cpu.to_string(), s.latest_memory.to_string()),
            None => (NO_DATA.to_string(), NO_DATA.to_string()),
        }
    }

    /// "Avg CPU: a.aa, Max CPU: m"
    pub fn cpu_summary(&self) -> String {
        match &self.stats {
            Some(s) => format!("Avg CPU: {:.2}, Max CPU: {}", s.avg_cpu, s.max_cpu),
            None => format!("Avg CPU: {}, Max CPU: {}", NO_DATA, NO_DATA),
        }
    }

    /// "Avg Memory: a.aa, Max Memory: m"
    pub fn memory_summary(&self) -> String {
        match &self.stats {
            Some(s) => format!("Avg Memory: {:.2}, Max Memory: {}", s.avg_memory, s.max_memory),
            None => format!("Avg Memory: {}, Max Memory: {}", NO_DATA, NO_DATA),
        }
    }
}

/// Format a timestamp for display.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
