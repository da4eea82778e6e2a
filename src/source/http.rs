//! HTTP sample source.
//!
//! Issues `GET <url>` and expects a JSON array of `{time, cpu, memory}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::SampleSource;
use crate::data::SampleSeries;
use crate::error::FetchError;

/// Data source URL used when `DATA_URL` is not set.
pub const DEFAULT_DATA_URL: &str = "http://35.154.27.230/data";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches samples from a remote HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    description: String,
}

impl HttpSource {
    /// Create a source for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        Self::builder().url(url).build()
    }

    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SampleSource for HttpSource {
    async fn fetch(&self) -> Result<SampleSeries, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        SampleSeries::from_json_slice(&body)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpSource`].
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpSourceBuilder {
    /// Set the data URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source.
    ///
    /// Fails if the HTTP client cannot be constructed (for example, when no
    /// TLS backend is available).
    pub fn build(self) -> Result<HttpSource, FetchError> {
        let url = self.url.unwrap_or_else(|| DEFAULT_DATA_URL.to_string());
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;
        Ok(HttpSource {
            client,
            description: format!("http: {}", url),
            url,
        })
    }
}
