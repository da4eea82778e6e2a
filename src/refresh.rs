//! Periodic refresh with user pause/resume.

use std::time::{Duration, Instant};

/// Default auto-refresh interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// Whether timer-driven refreshes are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Active,
    Paused,
}

impl RefreshState {
    pub fn toggled(self) -> Self {
        match self {
            RefreshState::Active => RefreshState::Paused,
            RefreshState::Paused => RefreshState::Active,
        }
    }
}

/// Two-state refresh timer. Only [`RefreshController::toggle`] changes state.
#[derive(Debug, Clone)]
pub struct RefreshController {
    state: RefreshState,
    interval: Duration,
    next_due: Instant,
}

impl RefreshController {
    /// Start active, with the first tick one interval after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            state: RefreshState::Active,
            interval,
            next_due: now + interval,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RefreshState::Active
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Flip between active and paused. Resuming restarts the interval.
    pub fn toggle(&mut self, now: Instant) -> RefreshState {
        self.state = self.state.toggled();
        if self.is_active() {
            self.next_due = now + self.interval;
        }
        self.state
    }

    /// Returns true when a timer-driven refresh is due.
    ///
    /// Never fires while paused. Fires at most once per call; ticks missed
    /// while the loop was busy collapse into one.
    pub fn poll_tick(&mut self, now: Instant) -> bool {
        if !self.is_active() || now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }

    /// Time until the next tick, or None while paused.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.is_active().then(|| self.next_due.saturating_duration_since(now))
    }

    /// Label for the pause/resume control.
    pub fn button_label(&self) -> &'static str {
        match self.state {
            RefreshState::Active => "Pause Updates",
            RefreshState::Paused => "Resume Updates",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn test_initial_state_is_active() {
        let c = RefreshController::new(DEFAULT_REFRESH_INTERVAL, Instant::now());
        assert_eq!(c.state(), RefreshState::Active);
        assert_eq!(c.button_label(), "Pause Updates");
    }

    #[test]
    fn test_toggle_twice_returns_to_active() {
        let now = Instant::now();
        let mut c = RefreshController::new(SEC, now);
        assert_eq!(c.toggle(now), RefreshState::Paused);
        assert_eq!(c.button_label(), "Resume Updates");
        assert_eq!(c.toggle(now), RefreshState::Active);
    }

    #[test]
    fn test_ticks_every_interval_while_active() {
        let start = Instant::now();
        let mut c = RefreshController::new(15 * SEC, start);
        assert!(!c.poll_tick(start));
        assert!(!c.poll_tick(start + 14 * SEC));
        assert!(c.poll_tick(start + 15 * SEC));
        assert!(!c.poll_tick(start + 16 * SEC));
        assert!(c.poll_tick(start + 30 * SEC));
    }

    #[test]
    fn test_paused_suppresses_ticks() {
        let start = Instant::now();
        let mut c = RefreshController::new(SEC, start);
        c.toggle(start);
        for i in 1..10 {
            assert!(!c.poll_tick(start + i * SEC));
        }
        assert_eq!(c.remaining(start), None);
    }

    #[test]
    fn test_resume_restarts_interval() {
        let start = Instant::now();
        let mut c = RefreshController::new(10 * SEC, start);
        c.toggle(start);
        c.toggle(start + 25 * SEC);
        assert!(!c.poll_tick(start + 26 * SEC));
        assert_eq!(c.remaining(start + 30 * SEC), Some(5 * SEC));
        assert!(c.poll_tick(start + 35 * SEC));
    }

    #[test]
    fn test_missed_ticks_collapse() {
        let start = Instant::now();
        let mut c = RefreshController::new(SEC, start);
        assert!(c.poll_tick(start + 100 * SEC));
        assert!(!c.poll_tick(start + 100 * SEC));
    }
}
