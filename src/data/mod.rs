//! Sample models and the pure computations over them.
//!
//! ## Submodules
//!
//! - [`sample`]: [`Sample`], [`SampleSeries`] and upstream JSON parsing
//! - [`range`]: Inclusive [`DateRange`] filtering and bound input parsing
//! - [`spike`]: Threshold-based spike detection
//! - [`stats`]: Latest/mean/max summaries with [`ColorLevel`] banding
//!
//! ## Data Flow
//!
//! ```text
//! JSON body ──▶ SampleSeries::from_json_slice() (sorted by time)
//!                     │
//!                     ▼
//!              DateRange::apply()
//!                     │
//!          ┌──────────┴──────────┐
//!          ▼                     ▼
//!    spike::detect()      stats::summarize()
//! ```

pub mod range;
pub mod sample;
pub mod spike;
pub mod stats;

pub use range::{parse_bound, Bound, DateRange};
pub use sample::{parse_timestamp, RawSample, Sample, SampleSeries};
pub use spike::{detect, DEFAULT_SPIKE_THRESHOLD};
pub use stats::{summarize, ColorLevel, Stats};
