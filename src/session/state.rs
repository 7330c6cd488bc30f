//! Session state aggregate
//!
//! Maintains:
//! - Current stage and playing flag
//! - Repetition count and the at-top latch for leg cycles
//! - Score with the regression penalty
//! - The session stopwatch

use std::time::Instant;

use super::clock::SessionClock;
use super::events::SessionSnapshot;
use super::stage::Stage;
use crate::config::SessionRules;

/// Complete mutable state of one guided-exercise run
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Current stage (Idle when no session runs)
    pub stage: Stage,
    /// Full up/down cycles completed in the current leg stage
    pub repetitions: u32,
    /// Top of a repetition reached, waiting for the return to straight
    pub at_top: bool,
    pub score: i32,
    pub playing: bool,
    pub clock: SessionClock,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            stage: Stage::Idle,
            repetitions: 0,
            at_top: false,
            score: 0,
            playing: false,
            clock: SessionClock::new(),
        }
    }

    /// Reset everything for a fresh run and start the clock
    pub fn begin(&mut self, rules: &SessionRules, now: Instant) {
        self.stage = Stage::Rest;
        self.repetitions = 0;
        self.at_top = false;
        self.score = rules.starting_score;
        self.playing = true;
        self.clock.restart(now);
    }

    /// Move to `stage`, resetting per-stage counters
    pub fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.repetitions = 0;
        self.at_top = false;
    }

    /// Pose lost mid-cycle: back to the start, one point off
    pub fn regress(&mut self, rules: &SessionRules) {
        self.enter(Stage::Rest);
        self.score -= 1;
        if rules.clamp_score_at_zero {
            self.score = self.score.max(0);
        }
    }

    /// Session finished or interrupted: freeze the clock, leave score readable
    pub fn halt(&mut self, now: Instant) {
        self.playing = false;
        self.clock.stop(now);
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            stage: self.stage,
            repetitions: self.repetitions,
            score: self.score,
            elapsed: self.clock.elapsed(now),
            playing: self.playing,
            at_top: self.at_top,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
