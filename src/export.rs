//! CSV serialization of sample series.

use std::fmt::Write as _;
use std::path::Path;

use chrono::SecondsFormat;

use crate::data::SampleSeries;

/// Header row, matching the sample field names.
pub const CSV_HEADER: &str = "time,cpu,memory";

/// Suggested file name for downloads and local exports.
pub const CSV_FILENAME: &str = "metrics.csv";

/// Render a series as CSV: header, then one row per sample in series order.
///
/// Times are RFC 3339 UTC; numbers use their shortest round-trip form.
pub fn to_csv(series: &SampleSeries) -> String {
    let mut output = String::with_capacity(CSV_HEADER.len() + 1 + series.len() * 40);
    output.push_str(CSV_HEADER);
    output.push('\n');

    for sample in series {
        // Writing into a String cannot fail.
        let _ = writeln!(
            output,
            "{},{},{}",
            sample.time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            sample.cpu,
            sample.memory
        );
    }

    output
}

/// Write a series to a CSV file.
pub fn write_csv_file(path: &Path, series: &SampleSeries) -> std::io::Result<()> {
    std::fs::write(path, to_csv(series))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SampleSeries {
        SampleSeries::from_json_slice(
            br#"[
                {"time": "2024-01-01T00:05:00Z", "cpu": 5, "memory": 3},
                {"time": "2024-01-01T00:00:00Z", "cpu": 1, "memory": 2}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_csv_exact_output() {
        assert_eq!(
            to_csv(&input()),
            "time,cpu,memory\n\
             2024-01-01T00:00:00Z,1,2\n\
             2024-01-01T00:05:00Z,5,3\n"
        );
    }

    #[test]
    fn test_csv_empty_series_is_header_only() {
        assert_eq!(to_csv(&SampleSeries::default()), "time,cpu,memory\n");
    }

    #[test]
    fn test_csv_keeps_fractions() {
        let series = SampleSeries::from_json_slice(
            br#"[{"time": "2024-01-01T00:00:00.250Z", "cpu": 0.1, "memory": 12.75}]"#,
        )
        .unwrap();
        assert_eq!(
            to_csv(&series).lines().nth(1),
            Some("2024-01-01T00:00:00.250Z,0.1,12.75")
        );
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CSV_FILENAME);
        write_csv_file(&path, &input()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(CSV_HEADER));
        assert_eq!(written.lines().count(), 3);
    }
}
