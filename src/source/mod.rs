//! Sample source abstraction.
//!
//! A [`SampleSource`] produces a fresh [`SampleSeries`] on every call. The
//! dashboard and the CSV endpoint each fetch independently; nothing is
//! cached between calls.

mod file;
mod http;

pub use file::FileSource;
pub use http::{HttpSource, HttpSourceBuilder, DEFAULT_DATA_URL};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::data::SampleSeries;
use crate::error::FetchError;

/// Trait for fetching samples from a backend.
///
/// # Example
///
/// ```no_run
/// use metricwatch::{HttpSource, SampleSource};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::new("http://localhost:8080/data")?;
/// let series = source.fetch().await?;
/// println!("{} samples from {}", series.len(), source.description());
/// # Ok::<_, metricwatch::FetchError>(())
/// # });
/// ```
#[async_trait]
pub trait SampleSource: Send + Sync + Debug {
    /// Fetch the full series, sorted ascending by time.
    async fn fetch(&self) -> Result<SampleSeries, FetchError>;

    /// Human-readable description, shown in the status bar.
    fn description(&self) -> &str;
}
