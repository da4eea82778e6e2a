//! # metricwatch
//!
//! A terminal dashboard and library for watching CPU and memory samples
//! served as JSON over HTTP.
//!
//! The dashboard polls a sample source on a fixed interval, marks CPU
//! spikes, summarizes the active date range and can pause, resume or
//! reload on demand. A small HTTP endpoint serves the full series as CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐ │
//! │  │  app    │───▶│   view   │───▶│   ui    │───▶│ Terminal │ │
//! │  │ (state) │    │ (render) │    │(drawing)│    │          │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘ │
//! │       │ triggers                                             │
//! │       ▼                                                      │
//! │  ┌──────────┐    ┌─────────┐                                 │
//! │  │ dispatch │───▶│ source  │◀── HttpSource | FileSource      │
//! │  │ (fetches)│    │ (input) │                                 │
//! │  └──────────┘    └────┬────┘                                 │
//! │                       │                                      │
//! │                  ┌────┴────┐                                 │
//! │                  │ server  │──▶ GET /download (CSV)          │
//! │                  └─────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Session state, date-range editing, pause/resume
//! - **[`refresh`]**: The Active/Paused refresh timer
//! - **[`dispatch`]**: Sequence-numbered fetches with last-trigger-wins delivery
//! - **[`source`]**: The [`SampleSource`] trait with HTTP and file implementations
//! - **[`data`]**: Samples, date ranges, spike detection and stats
//! - **[`view`]**: [`render`] turns a fetched series into a [`ViewModel`]
//! - **[`export`]** and **[`server`]**: CSV formatting and the download endpoint
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the default endpoint, serving CSV on 0.0.0.0:8000
//! metricwatch
//!
//! # Watch another endpoint every 5 seconds
//! DATA_URL=http://localhost:8080/data metricwatch --refresh 5
//!
//! # Only run the CSV endpoint
//! metricwatch --headless
//! ```
//!
//! ### As a library
//!
//! ```
//! use metricwatch::{render, DateRange, SampleSeries};
//!
//! let body = br#"[
//!     {"time": "2024-01-01T00:00:00Z", "cpu": 1, "memory": 2},
//!     {"time": "2024-01-01T00:05:00Z", "cpu": 5, "memory": 3}
//! ]"#;
//! let series = SampleSeries::from_json_slice(body).unwrap();
//! let view = render(&series, &DateRange::default(), 3.0);
//! assert_eq!(view.spike_count(), 1);
//! assert_eq!(view.cpu_summary(), "Avg CPU: 3.00, Max CPU: 5");
//! ```
//!
//! ### Driving the app without a terminal
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use metricwatch::{App, Fetcher, HttpSource};
//!
//! # tokio_test::block_on(async {
//! let source = Arc::new(HttpSource::new("http://localhost:8080/data")?);
//! let fetcher = Fetcher::new(source, tokio::runtime::Handle::current());
//! let mut app = App::new(fetcher, Duration::from_secs(15), 3.0);
//! app.start();
//! # Ok::<_, metricwatch::FetchError>(())
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod export;
pub mod refresh;
pub mod server;
pub mod source;
pub mod ui;
pub mod view;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{
    detect, summarize, Bound, ColorLevel, DateRange, Sample, SampleSeries, Stats,
    DEFAULT_SPIKE_THRESHOLD,
};
pub use dispatch::{Fetcher, TriggerSource};
pub use error::{EmptySeriesError, FetchError};
pub use refresh::{RefreshController, RefreshState};
pub use source::{FileSource, HttpSource, SampleSource};
pub use view::{render, ViewModel};
