//! Fetch scheduling: sequence numbers, in-flight tracking and result delivery.
//!
//! Every trigger is stamped with a monotonically increasing sequence number.
//! Results are applied only when newer than the last applied one, so a slow
//! response for an old trigger can never overwrite a newer render.
//!
//! Each trigger source has at most one fetch in flight:
//!
//! - `Timer` and `Initial` triggers that arrive while their fetch is still
//!   running are dropped.
//! - `DateRange` and `Manual` triggers are coalesced: one follow-up fetch is
//!   issued when the running one completes, carrying the newest range.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::data::{DateRange, SampleSeries};
use crate::error::FetchError;
use crate::source::SampleSource;

/// What started a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerSource {
    Initial,
    Timer,
    DateRange,
    Manual,
}

impl TriggerSource {
    const ALL: [TriggerSource; 4] = [
        TriggerSource::Initial,
        TriggerSource::Timer,
        TriggerSource::DateRange,
        TriggerSource::Manual,
    ];

    fn index(self) -> usize {
        match self {
            TriggerSource::Initial => 0,
            TriggerSource::Timer => 1,
            TriggerSource::DateRange => 2,
            TriggerSource::Manual => 3,
        }
    }

    /// Whether a re-trigger during an in-flight fetch is queued rather than dropped.
    fn coalesces(self) -> bool {
        matches!(self, TriggerSource::DateRange | TriggerSource::Manual)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TriggerSource::Initial => "initial",
            TriggerSource::Timer => "timer",
            TriggerSource::DateRange => "date-range",
            TriggerSource::Manual => "manual",
        }
    }
}

/// A fetch to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub source: TriggerSource,
    /// Range active when the trigger fired; the result is filtered with it.
    pub range: DateRange,
}

/// Outcome of a [`FetchRequest`].
#[derive(Debug)]
pub struct FetchResult {
    pub request: FetchRequest,
    pub outcome: Result<SampleSeries, FetchError>,
}

/// What the caller should do with a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// True when the result is newer than anything applied so far.
    pub apply: bool,
    /// A coalesced re-trigger to issue now.
    pub follow_up: Option<FetchRequest>,
}

/// Pure bookkeeping for triggers and completions.
#[derive(Debug, Default)]
pub struct Dispatcher {
    next_seq: u64,
    applied_seq: u64,
    in_flight: [Option<u64>; 4],
    queued: [bool; 4],
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger. Returns the request to run, or None if the source
    /// already has a fetch in flight.
    pub fn trigger(&mut self, source: TriggerSource, range: DateRange) -> Option<FetchRequest> {
        let idx = source.index();
        if self.in_flight[idx].is_some() {
            if source.coalesces() {
                self.queued[idx] = true;
                debug!(source = source.label(), "fetch in flight, queued re-trigger");
            } else {
                debug!(source = source.label(), "fetch in flight, dropped trigger");
            }
            return None;
        }
        Some(self.issue(source, range))
    }

    /// Record a completed fetch for `request`.
    ///
    /// `current_range` is used for any coalesced follow-up, so it reflects
    /// input made while the fetch was running.
    pub fn complete(&mut self, request: &FetchRequest, current_range: DateRange) -> Completion {
        let idx = request.source.index();
        if self.in_flight[idx] == Some(request.seq) {
            self.in_flight[idx] = None;
        }

        let apply = request.seq > self.applied_seq;
        if apply {
            self.applied_seq = request.seq;
        } else {
            debug!(
                seq = request.seq,
                applied = self.applied_seq,
                "dropping stale fetch result"
            );
        }

        let follow_up = if self.queued[idx] && self.in_flight[idx].is_none() {
            self.queued[idx] = false;
            Some(self.issue(request.source, current_range))
        } else {
            None
        };

        Completion { apply, follow_up }
    }

    pub fn in_flight(&self, source: TriggerSource) -> bool {
        self.in_flight[source.index()].is_some()
    }

    pub fn any_in_flight(&self) -> bool {
        TriggerSource::ALL.iter().any(|s| self.in_flight(*s))
    }

    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    fn issue(&mut self, source: TriggerSource, range: DateRange) -> FetchRequest {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight[source.index()] = Some(seq);
        FetchRequest { seq, source, range }
    }
}

/// Runs fetches on a tokio runtime and hands results back to the UI loop.
#[derive(Debug)]
pub struct Fetcher {
    source: Arc<dyn SampleSource>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<FetchResult>,
    rx: mpsc::UnboundedReceiver<FetchResult>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn SampleSource>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            tx,
            rx,
        }
    }

    pub fn description(&self) -> &str {
        self.source.description()
    }

    /// Start a fetch in the background.
    pub fn spawn(&self, request: FetchRequest) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        debug!(seq = request.seq, source = request.source.label(), "fetch started");

        self.runtime.spawn(async move {
            let outcome = source.fetch().await;
            match &outcome {
                Ok(series) => debug!(seq = request.seq, samples = series.len(), "fetch finished"),
                Err(e) => warn!(seq = request.seq, error = %e, "fetch failed"),
            }
            // Receiver gone means the UI is shutting down.
            let _ = tx.send(FetchResult { request, outcome });
        });
    }

    /// Take one finished result without blocking.
    pub fn try_recv(&mut self) -> Option<FetchResult> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished result.
    pub async fn recv(&mut self) -> Option<FetchResult> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[test]
    fn test_sequences_increase() {
        let mut d = Dispatcher::new();
        let a = d.trigger(TriggerSource::Initial, DateRange::default()).unwrap();
        let b = d.trigger(TriggerSource::Timer, DateRange::default()).unwrap();
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_timer_retrigger_dropped_while_in_flight() {
        let mut d = Dispatcher::new();
        let first = d.trigger(TriggerSource::Timer, DateRange::default()).unwrap();
        assert!(d.trigger(TriggerSource::Timer, DateRange::default()).is_none());

        let done = d.complete(&first, DateRange::default());
        assert!(done.apply);
        assert!(done.follow_up.is_none());
        assert!(!d.in_flight(TriggerSource::Timer));
        assert!(d.trigger(TriggerSource::Timer, DateRange::default()).is_some());
    }

    #[test]
    fn test_sources_are_independent() {
        let mut d = Dispatcher::new();
        assert!(d.trigger(TriggerSource::Timer, DateRange::default()).is_some());
        assert!(d.trigger(TriggerSource::DateRange, DateRange::default()).is_some());
        assert!(d.trigger(TriggerSource::Manual, DateRange::default()).is_some());
        assert!(d.any_in_flight());
    }

    #[test]
    fn test_stale_result_not_applied() {
        let mut d = Dispatcher::new();
        let old = d.trigger(TriggerSource::Timer, DateRange::default()).unwrap();
        let new = d.trigger(TriggerSource::DateRange, DateRange::default()).unwrap();

        // Newer result arrives first.
        assert!(d.complete(&new, DateRange::default()).apply);
        assert!(!d.complete(&old, DateRange::default()).apply);
        assert_eq!(d.applied_seq(), new.seq);
        assert!(!d.any_in_flight());
    }

    #[test]
    fn test_in_order_results_both_apply() {
        let mut d = Dispatcher::new();
        let old = d.trigger(TriggerSource::Timer, DateRange::default()).unwrap();
        let new = d.trigger(TriggerSource::Manual, DateRange::default()).unwrap();
        assert!(d.complete(&old, DateRange::default()).apply);
        assert!(d.complete(&new, DateRange::default()).apply);
    }

    #[test]
    fn test_date_range_retrigger_coalesces_with_newest_range() {
        use chrono::{TimeZone, Utc};

        let first_range = DateRange::default();
        let newest = DateRange::new(Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()), None);

        let mut d = Dispatcher::new();
        let first = d.trigger(TriggerSource::DateRange, first_range).unwrap();
        assert!(d.trigger(TriggerSource::DateRange, newest).is_none());
        assert!(d.trigger(TriggerSource::DateRange, newest).is_none());

        let done = d.complete(&first, newest);
        assert!(done.apply);
        let follow = done.follow_up.unwrap();
        assert_eq!(follow.range, newest);
        assert!(follow.seq > first.seq);
        assert!(d.in_flight(TriggerSource::DateRange));

        // Only one follow-up, however many re-triggers were queued.
        assert!(d.complete(&follow, newest).follow_up.is_none());
    }

    #[derive(Debug)]
    struct EmptySource;

    #[async_trait]
    impl SampleSource for EmptySource {
        async fn fetch(&self) -> Result<SampleSeries, FetchError> {
            Ok(SampleSeries::default())
        }

        fn description(&self) -> &str {
            "empty"
        }
    }

    #[tokio::test]
    async fn test_fetcher_delivers_result() {
        let mut fetcher = Fetcher::new(Arc::new(EmptySource), Handle::current());
        let mut d = Dispatcher::new();
        let req = d.trigger(TriggerSource::Initial, DateRange::default()).unwrap();
        fetcher.spawn(req);

        let result = fetcher.recv().await.unwrap();
        assert_eq!(result.request, req);
        assert!(result.outcome.unwrap().is_empty());
        assert_eq!(fetcher.description(), "empty");
    }
}
