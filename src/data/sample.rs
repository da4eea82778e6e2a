//! Sample and series types, plus parsing of the upstream JSON format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::FetchError;

/// One timestamped CPU/memory measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub cpu: f64,
    pub memory: f64,
}

impl Sample {
    pub fn new(time: DateTime<Utc>, cpu: f64, memory: f64) -> Self {
        Self { time, cpu, memory }
    }
}

/// Wire format of a single sample as served by the data source.
///
/// `time` stays a string here; it is coerced by [`parse_timestamp`] so that
/// a bad value is reported as [`FetchError::Timestamp`] rather than a generic
/// parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    pub time: String,
    pub cpu: f64,
    pub memory: f64,
}

/// Samples ordered ascending by time.
///
/// The only constructors sort their input, so iteration order is always
/// chronological.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    /// Build a series, sorting by time. Equal timestamps keep input order.
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.time);
        Self { samples }
    }

    /// Convert raw wire samples, failing on the first bad timestamp.
    pub fn from_raw(raw: Vec<RawSample>) -> Result<Self, FetchError> {
        let samples = raw
            .into_iter()
            .map(|r| Ok(Sample::new(parse_timestamp(&r.time)?, r.cpu, r.memory)))
            .collect::<Result<Vec<_>, FetchError>>()?;
        Ok(Self::new(samples))
    }

    /// Parse a JSON array of `{time, cpu, memory}` objects.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, FetchError> {
        let raw: Vec<RawSample> = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    /// Keep the samples matching `pred`. Order is preserved.
    pub fn filter(&self, mut pred: impl FnMut(&Sample) -> bool) -> Self {
        Self {
            samples: self.samples.iter().filter(|s| pred(s)).copied().collect(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

impl<'a> IntoIterator for &'a SampleSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Parse a sample timestamp.
///
/// Accepts RFC 3339 (converted to UTC), naive `YYYY-MM-DD[T ]HH:MM[:SS[.f]]`
/// taken as UTC (a trailing `Z` is allowed), and bare `YYYY-MM-DD` taken as
/// midnight UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, FetchError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive_part = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_part, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(FetchError::Timestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let t = parse_timestamp("2024-01-01T00:05:00Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_converts_to_utc() {
        let t = parse_timestamp("2024-01-01T05:35:00+05:30").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-02 10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-02T10:00:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-03-02").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_minute_precision() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01T00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-01 00:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-01-01 10:30Z").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_minute_precision_sample_in_body() {
        let series = SampleSeries::from_json_slice(
            br#"[{"time": "2024-01-01T00:05Z", "cpu": 1, "memory": 1}]"#,
        )
        .unwrap();
        assert_eq!(
            series.first().unwrap().time,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, FetchError::Timestamp(ref s) if s == "yesterday"));
    }

    #[test]
    fn test_series_sorted_on_parse() {
        let json = br#"[
            {"time": "2024-01-01T00:05:00Z", "cpu": 5, "memory": 3},
            {"time": "2024-01-01T00:00:00Z", "cpu": 1, "memory": 2}
        ]"#;
        let series = SampleSeries::from_json_slice(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().cpu, 1.0);
        assert_eq!(series.last().unwrap().cpu, 5.0);
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = SampleSeries::from_json_slice(br#"{"time": "x"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));

        let err = SampleSeries::from_json_slice(br#"[{"time": "2024-01-01", "cpu": "high"}]"#)
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_bad_timestamp_in_body() {
        let err =
            SampleSeries::from_json_slice(br#"[{"time": "soon", "cpu": 1, "memory": 1}]"#)
                .unwrap_err();
        assert!(matches!(err, FetchError::Timestamp(_)));
    }

    #[test]
    fn test_empty_array_is_empty_series() {
        let series = SampleSeries::from_json_slice(b"[]").unwrap();
        assert!(series.is_empty());
    }
}
