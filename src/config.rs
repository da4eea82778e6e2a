//! Layered runtime settings.
//!
//! Lowest to highest priority: built-in defaults, an optional TOML file,
//! `METRICWATCH_*` environment variables, `DATA_URL`, then command-line
//! overrides applied by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, Map};
use serde::Deserialize;

use crate::data::DEFAULT_SPIKE_THRESHOLD;
use crate::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::server::DEFAULT_LISTEN_ADDR;
use crate::source::DEFAULT_DATA_URL;

/// Environment variable naming the remote data source.
pub const DATA_URL_ENV: &str = "DATA_URL";

const ENV_PREFIX: &str = "METRICWATCH";

/// Resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub data_url: String,
    pub listen_addr: String,
    pub refresh_secs: u64,
    pub spike_threshold: f64,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            refresh_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            spike_threshold: DEFAULT_SPIKE_THRESHOLD,
            request_timeout_secs: 10,
            log_file: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment and an optional file.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with(file, None, std::env::var(DATA_URL_ENV).ok())
    }

    /// Load settings with explicit environment values.
    ///
    /// `env` replaces the process environment for the `METRICWATCH_*` layer
    /// when given. `data_url` is the `DATA_URL` value.
    pub fn load_with(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
        data_url: Option<String>,
    ) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("data_url", defaults.data_url)?
            .set_default("listen_addr", defaults.listen_addr)?
            .set_default("refresh_secs", defaults.refresh_secs)?
            .set_default("spike_threshold", defaults.spike_threshold)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("log_filter", defaults.log_filter)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("data_url", data_url)?
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the dashboard cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_secs == 0 {
            bail!("refresh_secs must be greater than zero");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        if !self.spike_threshold.is_finite() {
            bail!("spike_threshold must be a finite number");
        }
        if self.data_url.trim().is_empty() {
            bail!("data_url must not be empty");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> Option<Map<String, String>> {
        Some(Map::new())
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with(None, no_env(), None).unwrap();
        assert_eq!(settings.data_url, "http://35.154.27.230/data");
        assert_eq!(settings.listen_addr, "0.0.0.0:8000");
        assert_eq!(settings.refresh_interval(), Duration::from_secs(15));
        assert_eq!(settings.spike_threshold, 3.0);
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_data_url_override() {
        let settings =
            Settings::load_with(None, no_env(), Some("http://example.test/metrics".to_string())).unwrap();
        assert_eq!(settings.data_url, "http://example.test/metrics");
    }

    #[test]
    fn test_file_layer_and_data_url_priority() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
data_url = "http://from-file/data"
refresh_secs = 30
spike_threshold = 7.5
log_file = "/tmp/metricwatch.log"
"#
        )
        .unwrap();

        let settings = Settings::load_with(Some(file.path()), no_env(), None).unwrap();
        assert_eq!(settings.data_url, "http://from-file/data");
        assert_eq!(settings.refresh_secs, 30);
        assert_eq!(settings.spike_threshold, 7.5);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/metricwatch.log")));

        let settings =
            Settings::load_with(Some(file.path()), no_env(), Some("http://from-env/data".to_string()))
                .unwrap();
        assert_eq!(settings.data_url, "http://from-env/data");
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "refresh_secs = 0").unwrap();
        assert!(Settings::load_with(Some(file.path()), no_env(), None).is_err());
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let file = toml_file("request_timeout_secs = 0");
        let err = Settings::load_with(Some(file.path()), no_env(), None).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn test_env_layer_beats_file_and_data_url_beats_both() {
        let file = toml_file(
            r#"
data_url = "http://from-file/data"
refresh_secs = 30
spike_threshold = 7.5
"#,
        );

        let mut env = Map::new();
        env.insert("METRICWATCH_REFRESH_SECS".to_string(), "45".to_string());
        env.insert("METRICWATCH_DATA_URL".to_string(), "http://from-prefixed-env/data".to_string());

        let settings = Settings::load_with(Some(file.path()), Some(env.clone()), None).unwrap();
        assert_eq!(settings.refresh_secs, 45);
        assert_eq!(settings.data_url, "http://from-prefixed-env/data");
        // Untouched by the environment.
        assert_eq!(settings.spike_threshold, 7.5);

        let settings = Settings::load_with(
            Some(file.path()),
            Some(env),
            Some("http://from-data-url/data".to_string()),
        )
        .unwrap();
        assert_eq!(settings.data_url, "http://from-data-url/data");
        assert_eq!(settings.refresh_secs, 45);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Settings::load_with(Some(Path::new("/nonexistent/metricwatch.toml")), no_env(), None).is_err());
    }
}
