//! File-based sample source.
//!
//! Reads the same JSON array the HTTP source expects from a local file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::SampleSource;
use crate::data::SampleSeries;
use crate::error::FetchError;

/// A source that re-reads a JSON sample file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SampleSource for FileSource {
    async fn fetch(&self) -> Result<SampleSeries, FetchError> {
        let content = tokio::fs::read(&self.path).await?;
        SampleSeries::from_json_slice(&content)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/samples.json");
        assert_eq!(source.path(), Path::new("/tmp/samples.json"));
        assert_eq!(source.description(), "file: /tmp/samples.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[{{"time": "2024-01-01T00:00:00Z", "cpu": 1.5, "memory": 40}}]"#
        )
        .unwrap();

        let source = FileSource::new(file.path());
        let series = source.fetch().await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.first().unwrap().memory, 40.0);
    }

    #[tokio::test]
    async fn test_file_source_rereads_on_each_fetch() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let source = FileSource::new(file.path());
        assert!(source.fetch().await.unwrap().is_empty());

        std::fs::write(
            file.path(),
            r#"[{"time": "2024-01-01", "cpu": 2, "memory": 2}]"#,
        )
        .unwrap();
        assert_eq!(source.fetch().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/path/samples.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
        assert!(err.to_string().contains("Read error"));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let source = FileSource::new(file.path());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
