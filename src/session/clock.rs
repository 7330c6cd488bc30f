//! Pausable session stopwatch
//!
//! Time is passed in rather than read, so replays and tests stay
//! deterministic. Elapsed time is frozen from `stop` until the next `start`.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub struct SessionClock {
    running_since: Option<Instant>,
    accumulated: Duration,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero and start counting from `now`
    pub fn restart(&mut self, now: Instant) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(now);
    }

    pub fn stop(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }
}
