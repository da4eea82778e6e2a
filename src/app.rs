//! Dashboard session state.
//!
//! [`App`] is the session context: refresh state, date range, the last
//! successfully rendered [`ViewModel`] and the last fetched series. Nothing
//! is global; the UI layer borrows an `App` to draw.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::data::{parse_bound, Bound, DateRange, SampleSeries};
use crate::dispatch::{Dispatcher, FetchResult, Fetcher, TriggerSource};
use crate::export::write_csv_file;
use crate::refresh::RefreshController;
use crate::ui::Theme;
use crate::view::{render, ViewModel};

/// How long temporary status messages stay visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Text being typed for one date-range bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeInput {
    pub bound: Bound,
    pub text: String,
}

/// The most recent fetch failure, shown inline above the last good view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub message: String,
    pub at: Instant,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    fetcher: Fetcher,
    dispatcher: Dispatcher,
    pub refresh: RefreshController,
    pub range: DateRange,
    pub threshold: f64,

    /// Last successful render; kept when later fetches fail.
    pub view: Option<ViewModel>,
    /// Unfiltered series behind `view`.
    pub last_fetched: Option<SampleSeries>,
    pub last_updated: Option<Instant>,
    pub load_error: Option<LoadError>,

    pub range_input: Option<RangeInput>,

    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App. Nothing is fetched until [`App::start`].
    pub fn new(fetcher: Fetcher, refresh_interval: Duration, threshold: f64) -> Self {
        Self {
            running: true,
            show_help: false,
            fetcher,
            dispatcher: Dispatcher::new(),
            refresh: RefreshController::new(refresh_interval, Instant::now()),
            range: DateRange::default(),
            threshold,
            view: None,
            last_fetched: None,
            last_updated: None,
            load_error: None,
            range_input: None,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.fetcher.description()
    }

    /// Issue the initial load.
    pub fn start(&mut self) {
        self.trigger(TriggerSource::Initial);
    }

    /// Start a fetch for `source` unless one is already in flight.
    pub fn trigger(&mut self, source: TriggerSource) {
        if let Some(request) = self.dispatcher.trigger(source, self.range) {
            self.fetcher.spawn(request);
        }
    }

    /// Fire a timer refresh if one is due.
    pub fn tick(&mut self, now: Instant) {
        if self.refresh.poll_tick(now) {
            self.trigger(TriggerSource::Timer);
        }
    }

    /// Apply every finished fetch. Returns true if the view changed.
    pub fn drain_results(&mut self) -> bool {
        let mut changed = false;
        while let Some(result) = self.fetcher.try_recv() {
            changed |= self.apply(result);
        }
        changed
    }

    /// Apply one fetch result, honoring last-trigger-wins ordering.
    ///
    /// On success the view is rebuilt with the range captured at trigger
    /// time. On failure the error is recorded and the previous view kept.
    pub fn apply(&mut self, result: FetchResult) -> bool {
        let FetchResult { request, outcome } = result;
        let completion = self.dispatcher.complete(&request, self.range);

        if let Some(follow_up) = completion.follow_up {
            self.fetcher.spawn(follow_up);
        }

        if !completion.apply {
            return false;
        }

        match outcome {
            Ok(series) => {
                self.view = Some(render(&series, &request.range, self.threshold));
                self.last_fetched = Some(series);
                self.last_updated = Some(Instant::now());
                self.load_error = None;
            }
            Err(e) => {
                self.load_error = Some(LoadError {
                    message: e.to_string(),
                    at: Instant::now(),
                });
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.dispatcher.any_in_flight()
    }

    /// Pause or resume timer-driven refreshes.
    pub fn toggle_pause(&mut self) {
        self.refresh.toggle(Instant::now());
        let label = if self.refresh.is_active() {
            "Updates resumed"
        } else {
            "Updates paused"
        };
        self.set_status_message(label.to_string());
    }

    /// Begin typing a value for `bound`, prefilled with its current value.
    pub fn start_range_input(&mut self, bound: Bound) {
        let text = self
            .range
            .get(bound)
            .map(crate::view::format_time)
            .unwrap_or_default();
        self.range_input = Some(RangeInput { bound, text });
    }

    pub fn cancel_range_input(&mut self) {
        self.range_input = None;
    }

    pub fn range_input_push(&mut self, c: char) {
        if let Some(input) = self.range_input.as_mut() {
            input.text.push(c);
        }
    }

    pub fn range_input_pop(&mut self) {
        if let Some(input) = self.range_input.as_mut() {
            input.text.pop();
        }
    }

    /// Parse the typed bound and, if valid, apply it and refresh.
    ///
    /// Invalid input keeps the editor open and the range unchanged.
    pub fn commit_range_input(&mut self) {
        let Some(input) = self.range_input.as_ref() else {
            return;
        };
        match parse_bound(&input.text, input.bound) {
            Ok(value) => {
                let bound = input.bound;
                self.range_input = None;
                self.set_range_bound(bound, value);
            }
            Err(msg) => self.set_status_message(msg),
        }
    }

    /// Set one bound and trigger a date-range refresh if it changed.
    pub fn set_range_bound(&mut self, bound: Bound, value: Option<chrono::DateTime<chrono::Utc>>) {
        if self.range.get(bound) == value {
            return;
        }
        self.range.set(bound, value);
        self.trigger(TriggerSource::DateRange);
    }

    /// Clear both bounds and refresh.
    pub fn clear_range(&mut self) {
        if self.range.is_unbounded() {
            return;
        }
        self.range.clear();
        self.trigger(TriggerSource::DateRange);
    }

    /// Write the last fetched, unfiltered series to a CSV file.
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let Some(series) = self.last_fetched.as_ref() else {
            anyhow::bail!("No data to export");
        };
        write_csv_file(path, series)?;
        Ok(series.len())
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Issue a request directly, bypassing triggers. Test hook.
    #[cfg(test)]
    pub(crate) fn dispatch_for_test(
        &mut self,
        source: TriggerSource,
    ) -> Option<crate::dispatch::FetchRequest> {
        self.dispatcher.trigger(source, self.range)
    }
}
