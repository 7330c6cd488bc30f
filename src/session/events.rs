//! Session events and the observer contract
//!
//! The sequencer never touches presentation state. Whatever renders the
//! session implements `SessionObserver` and gets a snapshot whenever the
//! visible state changes plus every discrete event.

use std::time::Duration;

use serde::Serialize;

use super::stage::Stage;

/// Discrete things that happened while processing a frame or control signal
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted,
    StageAdvanced { from: Stage, to: Stage },
    RepetitionCounted { count: u32 },
    RegressedWithPenalty { score: i32 },
    SessionEnded,
    SessionStopped,
}

impl SessionEvent {
    /// Short feedback line for the user
    pub fn feedback(&self) -> String {
        match self {
            SessionEvent::SessionStarted => "Let's begin!".to_string(),
            SessionEvent::StageAdvanced { to, .. } => match to {
                Stage::ArmsRaised => "Well done, first position reached".to_string(),
                Stage::LeftLegCycle => "Perfect! On to the next level".to_string(),
                Stage::RightLegCycle => "Great work! Now repeat with the other leg".to_string(),
                Stage::ReturnToRest => "Almost done, just relax".to_string(),
                Stage::Complete => "Congratulations, you made it!".to_string(),
                _ => format!("Now: {:?}", to),
            },
            SessionEvent::RepetitionCounted { count } => format!("Repetition {} done", count),
            SessionEvent::RegressedWithPenalty { .. } => {
                "You lowered your arms, we have to start again".to_string()
            }
            SessionEvent::SessionEnded => "Session finished".to_string(),
            SessionEvent::SessionStopped => "Session stopped".to_string(),
        }
    }
}

/// Observable session state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub repetitions: u32,
    pub score: i32,
    pub elapsed: Duration,
    pub playing: bool,
    pub at_top: bool,
}

/// Receiver for session updates
pub trait SessionObserver {
    fn on_state_changed(&mut self, snapshot: &SessionSnapshot);

    fn on_event(&mut self, event: &SessionEvent);
}

/// Observer that ignores everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn on_state_changed(&mut self, _snapshot: &SessionSnapshot) {}

    fn on_event(&mut self, _event: &SessionEvent) {}
}

/// Observer that keeps everything it is told, in order
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    pub snapshots: Vec<SessionSnapshot>,
    pub events: Vec<SessionEvent>,
}

impl RecordingObserver {
    pub fn last_snapshot(&self) -> Option<&SessionSnapshot> {
        self.snapshots.last()
    }

    pub fn count(&self, pred: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_state_changed(&mut self, snapshot: &SessionSnapshot) {
        self.snapshots.push(*snapshot);
    }

    fn on_event(&mut self, event: &SessionEvent) {
        self.events.push(event.clone());
    }
}
