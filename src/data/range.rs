//! Inclusive date-range filtering.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::sample::{parse_timestamp, SampleSeries};

/// Which side of a [`DateRange`] a bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl Bound {
    pub fn label(&self) -> &'static str {
        match self {
            Bound::Start => "start",
            Bound::End => "end",
        }
    }
}

/// Optional start/end bounds, both inclusive.
///
/// An unset bound does not filter its side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| time >= start) && self.end.is_none_or(|end| time <= end)
    }

    /// Samples within the range, order preserved.
    pub fn apply(&self, series: &SampleSeries) -> SampleSeries {
        if self.is_unbounded() {
            return series.clone();
        }
        series.filter(|s| self.contains(s.time))
    }

    pub fn set(&mut self, bound: Bound, value: Option<DateTime<Utc>>) {
        match bound {
            Bound::Start => self.start = value,
            Bound::End => self.end = value,
        }
    }

    pub fn get(&self, bound: Bound) -> Option<DateTime<Utc>> {
        match bound {
            Bound::Start => self.start,
            Bound::End => self.end,
        }
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }
}

/// Parse user input for one bound.
///
/// Empty input unsets the bound. A bare date covers the whole day: a start
/// date means midnight, an end date means the last nanosecond of that day.
/// Anything else goes through the sample timestamp parser.
pub fn parse_bound(input: &str, bound: Bound) -> Result<Option<DateTime<Utc>>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
                .ok_or_else(|| "invalid end of day".to_string())?,
        };
        return Ok(Some(date.and_time(time).and_utc()));
    }

    parse_timestamp(input)
        .map(Some)
        .map_err(|_| format!("Invalid {} date: {:?} (use YYYY-MM-DD)", bound.label(), input))
}
