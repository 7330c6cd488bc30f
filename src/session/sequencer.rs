//! Exercise sequencer: the per-frame state machine
//!
//! One frame in, zero or more events out. Stages only move forward, except
//! that losing the arms-up pose during a leg cycle sends the user back to
//! `Rest` with a one-point penalty.
//!
//! Leg cycles count a repetition in two phases: the raised-leg pose sets the
//! at-top latch, and the following straight-with-arms-up frame clears it and
//! counts. A noisy pose estimate can flicker in and out of the raised pose
//! without double counting because nothing happens until the feet come back
//! together.

use std::time::Instant;

use tracing::{debug, info, trace, warn};

use super::events::{SessionEvent, SessionObserver, SessionSnapshot};
use super::stage::Stage;
use super::state::SessionState;
use super::stats::{SessionStats, SessionSummary};
use crate::config::{CoachConfig, SessionRules};
use crate::pose::PoseClassifier;
use crate::skeleton::{Frame, Side};

pub struct Sequencer<O: SessionObserver> {
    classifier: PoseClassifier,
    rules: SessionRules,
    state: SessionState,
    stats: SessionStats,
    observer: O,
    last_published: Option<SessionSnapshot>,
    last_summary: Option<SessionSummary>,
    /// Auto-start waits for a non-rest frame after each session
    auto_start_armed: bool,
}

impl<O: SessionObserver> Sequencer<O> {
    pub fn new(config: &CoachConfig, observer: O) -> Self {
        Self {
            classifier: PoseClassifier::new(config.pose.clone()),
            rules: config.session.clone(),
            state: SessionState::new(),
            stats: SessionStats::new(),
            observer,
            last_published: None,
            last_summary: None,
            auto_start_armed: true,
        }
    }

    pub fn request_start(&mut self) -> Vec<SessionEvent> {
        self.request_start_at(Instant::now())
    }

    /// Begin a session. Ignored while one is already playing.
    pub fn request_start_at(&mut self, now: Instant) -> Vec<SessionEvent> {
        if self.state.playing {
            debug!(stage = ?self.state.stage, "start requested while playing, ignoring");
            return Vec::new();
        }

        self.state.begin(&self.rules, now);
        self.stats.reset();
        self.last_summary = None;
        info!(score = self.state.score, "session started");

        let events = vec![SessionEvent::SessionStarted];
        self.publish(&events, now);
        events
    }

    pub fn request_stop(&mut self) -> Vec<SessionEvent> {
        self.request_stop_at(Instant::now())
    }

    /// Interrupt the session. Stage, repetitions and score stay visible and
    /// the clock stays frozen until the next start.
    pub fn request_stop_at(&mut self, now: Instant) -> Vec<SessionEvent> {
        if !self.state.playing {
            return Vec::new();
        }

        self.state.halt(now);
        self.auto_start_armed = false;
        self.last_summary = Some(self.stats.summarize(
            false,
            self.state.score,
            self.state.clock.elapsed(now),
        ));
        info!(stage = ?self.state.stage, score = self.state.score, "session stopped");

        let events = vec![SessionEvent::SessionStopped];
        self.publish(&events, now);
        events
    }

    pub fn step(&mut self, frame: &Frame) -> Vec<SessionEvent> {
        self.step_at(frame, Instant::now())
    }

    /// Feed one frame through the state machine
    pub fn step_at(&mut self, frame: &Frame, now: Instant) -> Vec<SessionEvent> {
        if !self.state.playing {
            return self.step_idle(frame, now);
        }

        let stage = self.state.stage;
        self.stats.record_frame(stage);
        trace!(
            stage = ?stage,
            timestamp_ms = frame.timestamp_ms(),
            poses = ?self.classifier.classify(frame),
            "frame"
        );

        let mut events = Vec::new();
        match stage {
            Stage::Rest | Stage::ReturnToRest => {
                if self.classifier.rest_pose(frame) {
                    self.advance(&mut events);
                }
            }
            Stage::ArmsRaised => {
                if self.classifier.arms_up_pose(frame) {
                    self.advance(&mut events);
                }
            }
            Stage::LeftLegCycle => self.leg_cycle(Side::Left, frame, &mut events),
            Stage::RightLegCycle => self.leg_cycle(Side::Right, frame, &mut events),
            Stage::Idle | Stage::Complete => {}
        }

        if self.state.stage == Stage::Complete {
            self.finish(now, &mut events);
        }

        self.publish(&events, now);
        events
    }

    /// Rules shared by both leg stages, in priority order
    fn leg_cycle(&mut self, side: Side, frame: &Frame, events: &mut Vec<SessionEvent>) {
        let stage = self.state.stage;

        if !self.classifier.arms_up_pose(frame) {
            self.state.regress(&self.rules);
            self.stats.record_regression(stage);
            warn!(from = ?stage, score = self.state.score, "arms lowered, back to rest");
            events.push(SessionEvent::RegressedWithPenalty {
                score: self.state.score,
            });
            return;
        }

        if !self.state.at_top {
            if self.classifier.leg_up_pose(side, frame) {
                self.state.at_top = true;
                self.stats.record_latch(stage);
                debug!(?side, "top of repetition reached");
            }
            return;
        }

        if self.classifier.straight_with_arms_up_pose(frame)
            && self.state.repetitions <= self.rules.reps_per_leg
        {
            self.state.at_top = false;
            self.state.repetitions += 1;
            self.stats.record_repetition(stage);
            debug!(?side, count = self.state.repetitions, "repetition counted");
            events.push(SessionEvent::RepetitionCounted {
                count: self.state.repetitions,
            });

            if self.state.repetitions == self.rules.reps_per_leg {
                self.advance(events);
            }
        }
    }

    fn advance(&mut self, events: &mut Vec<SessionEvent>) {
        let from = self.state.stage;
        if let Some(to) = from.next() {
            self.state.enter(to);
            debug!(?from, ?to, "stage advanced");
            events.push(SessionEvent::StageAdvanced { from, to });
        }
    }

    fn finish(&mut self, now: Instant, events: &mut Vec<SessionEvent>) {
        self.state.halt(now);
        let elapsed = self.state.clock.elapsed(now);
        self.last_summary = Some(self.stats.summarize(true, self.state.score, elapsed));
        self.state.enter(Stage::Idle);
        self.auto_start_armed = false;
        info!(
            score = self.state.score,
            elapsed_ms = elapsed.as_millis() as u64,
            "session complete"
        );
        events.push(SessionEvent::SessionEnded);
    }

    fn step_idle(&mut self, frame: &Frame, now: Instant) -> Vec<SessionEvent> {
        if !self.rules.auto_start_on_rest_pose {
            return Vec::new();
        }

        if !self.classifier.rest_pose(frame) {
            self.auto_start_armed = true;
            return Vec::new();
        }

        if self.auto_start_armed {
            debug!("rest pose held while idle, starting");
            return self.request_start_at(now);
        }
        Vec::new()
    }

    fn publish(&mut self, events: &[SessionEvent], now: Instant) {
        for event in events {
            self.observer.on_event(event);
        }

        let snapshot = self.state.snapshot(now);
        if self.last_published != Some(snapshot) {
            self.observer.on_state_changed(&snapshot);
            self.last_published = Some(snapshot);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot_at(&self, now: Instant) -> SessionSnapshot {
        self.state.snapshot(now)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Report for the most recently ended or stopped session
    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::events::RecordingObserver;
    use crate::skeleton::{poses, Joint, JointSample};
    use std::time::Duration;

    fn sequencer() -> Sequencer<RecordingObserver> {
        Sequencer::new(&CoachConfig::default(), RecordingObserver::default())
    }

    fn in_left_leg_cycle(t0: Instant) -> Sequencer<RecordingObserver> {
        let mut seq = sequencer();
        seq.request_start_at(t0);
        seq.step_at(&poses::rest(0), t0);
        seq.step_at(&poses::arms_up(0), t0);
        assert_eq!(seq.stage(), Stage::LeftLegCycle);
        seq
    }

    #[test]
    fn test_frames_ignored_before_start() {
        let mut seq = sequencer();
        let events = seq.step_at(&poses::rest(0), Instant::now());
        assert!(events.is_empty());
        assert_eq!(seq.stage(), Stage::Idle);
        assert!(seq.observer().snapshots.is_empty());
    }

    #[test]
    fn test_start_is_idempotent_while_playing() {
        let t0 = Instant::now();
        let mut seq = sequencer();
        assert_eq!(seq.request_start_at(t0), vec![SessionEvent::SessionStarted]);
        seq.step_at(&poses::rest(0), t0);

        let events = seq.request_start_at(t0 + Duration::from_secs(1));
        assert!(events.is_empty());
        assert_eq!(seq.stage(), Stage::ArmsRaised);
        assert_eq!(seq.state().clock.elapsed(t0 + Duration::from_secs(2)), Duration::from_secs(2));
    }

    #[test]
    fn test_rest_frames_in_arms_raised_change_nothing() {
        let t0 = Instant::now();
        let mut seq = sequencer();
        seq.request_start_at(t0);
        seq.step_at(&poses::rest(0), t0);
        assert_eq!(seq.stage(), Stage::ArmsRaised);

        for i in 1..20 {
            let events = seq.step_at(&poses::rest(i), t0);
            assert!(events.is_empty());
        }
        let state = seq.state();
        assert_eq!(state.stage, Stage::ArmsRaised);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_latch_waits_for_straight_pose() {
        let t0 = Instant::now();
        let mut seq = in_left_leg_cycle(t0);

        let raised = poses::arms_up_leg_raised(0, Side::Left, 40.0);
        assert!(seq.step_at(&raised, t0).is_empty());
        assert!(seq.state().at_top);

        // Holding the leg up or flickering at the top counts nothing
        for _ in 0..5 {
            assert!(seq.step_at(&raised, t0).is_empty());
            assert!(seq.step_at(&poses::arms_up_leg_raised(0, Side::Left, 25.0), t0).is_empty());
        }
        assert_eq!(seq.state().repetitions, 0);

        let events = seq.step_at(&poses::arms_up(0), t0);
        assert_eq!(events, vec![SessionEvent::RepetitionCounted { count: 1 }]);
        assert!(!seq.state().at_top);
    }

    #[test]
    fn test_straight_pose_without_latch_counts_nothing() {
        let t0 = Instant::now();
        let mut seq = in_left_leg_cycle(t0);
        for _ in 0..10 {
            assert!(seq.step_at(&poses::arms_up(0), t0).is_empty());
        }
        assert_eq!(seq.state().repetitions, 0);
    }

    #[test]
    fn test_wrong_leg_does_not_latch() {
        let t0 = Instant::now();
        let mut seq = in_left_leg_cycle(t0);
        seq.step_at(&poses::arms_up_leg_raised(0, Side::Right, 40.0), t0);
        assert!(!seq.state().at_top);
    }

    #[test]
    fn test_regression_takes_precedence() {
        let t0 = Instant::now();
        let mut seq = in_left_leg_cycle(t0);
        seq.step_at(&poses::arms_up_leg_raised(0, Side::Left, 40.0), t0);
        seq.step_at(&poses::arms_up(0), t0);
        assert_eq!(seq.state().repetitions, 1);

        // Leg raised but arms down: only the regression fires
        let events = seq.step_at(&poses::arms_down_leg_raised(0, Side::Left, 40.0), t0);
        assert_eq!(events, vec![SessionEvent::RegressedWithPenalty { score: 9 }]);
        let state = seq.state();
        assert_eq!(state.stage, Stage::Rest);
        assert_eq!(state.repetitions, 0);
        assert!(!state.at_top);
        assert_eq!(state.score, 9);
        assert_eq!(seq.stats().stage(Stage::LeftLegCycle).regressions, 1);
    }

    #[test]
    fn test_lost_wrist_counts_as_arms_down() {
        let t0 = Instant::now();
        let mut seq = in_left_leg_cycle(t0);
        let frame = poses::arms_up(0).with_sample(Joint::WristLeft, JointSample::default());
        let events = seq.step_at(&frame, t0);
        assert_eq!(events, vec![SessionEvent::RegressedWithPenalty { score: 9 }]);
    }

    #[test]
    fn test_score_goes_negative_without_clamp() {
        let t0 = Instant::now();
        let mut seq = sequencer();
        seq.request_start_at(t0);
        for _ in 0..12 {
            seq.step_at(&poses::rest(0), t0);
            seq.step_at(&poses::arms_up(0), t0);
            seq.step_at(&poses::rest(0), t0);
        }
        // Each loop regresses once then re-enters ArmsRaised from Rest
        assert_eq!(seq.state().score, -2);
    }

    #[test]
    fn test_score_floors_at_zero_with_clamp() {
        let t0 = Instant::now();
        let mut config = CoachConfig::default();
        config.session.clamp_score_at_zero = true;
        let mut seq = Sequencer::new(&config, RecordingObserver::default());
        seq.request_start_at(t0);
        for _ in 0..12 {
            seq.step_at(&poses::rest(0), t0);
            seq.step_at(&poses::arms_up(0), t0);
            seq.step_at(&poses::rest(0), t0);
        }
        assert_eq!(seq.state().score, 0);
    }

    #[test]
    fn test_stop_freezes_clock_and_keeps_state() {
        let t0 = Instant::now();
        let mut seq = in_left_leg_cycle(t0);
        let events = seq.request_stop_at(t0 + Duration::from_secs(4));
        assert_eq!(events, vec![SessionEvent::SessionStopped]);
        assert!(!seq.is_playing());
        assert_eq!(seq.observer().last_snapshot().map(|s| s.playing), Some(false));

        // Frames after stop are ignored
        assert!(seq.step_at(&poses::rest(0), t0 + Duration::from_secs(8)).is_empty());
        let snap = seq.snapshot_at(t0 + Duration::from_secs(30));
        assert_eq!(snap.stage, Stage::LeftLegCycle);
        assert_eq!(snap.elapsed, Duration::from_secs(4));

        let summary = seq.last_summary().unwrap();
        assert!(!summary.completed);

        // Restart resets
        seq.request_start_at(t0 + Duration::from_secs(40));
        let snap = seq.snapshot_at(t0 + Duration::from_secs(41));
        assert_eq!(snap.stage, Stage::Rest);
        assert_eq!(snap.elapsed, Duration::from_secs(1));
        assert!(seq.last_summary().is_none());
    }

    #[test]
    fn test_state_changes_published_once_per_change() {
        let t0 = Instant::now();
        let mut seq = sequencer();
        seq.request_start_at(t0);
        // Same instant, nothing moves: no new snapshot
        seq.step_at(&poses::arms_up(0), t0);
        seq.step_at(&poses::arms_up(0), t0);
        assert_eq!(seq.observer().snapshots.len(), 1);

        // Time advanced: elapsed changed
        seq.step_at(&poses::arms_up(0), t0 + Duration::from_millis(33));
        assert_eq!(seq.observer().snapshots.len(), 2);
    }

    #[test]
    fn test_auto_start_from_rest_pose() {
        let t0 = Instant::now();
        let mut config = CoachConfig::default();
        config.session.auto_start_on_rest_pose = true;
        let mut seq = Sequencer::new(&config, RecordingObserver::default());

        assert!(seq.step_at(&poses::arms_up(0), t0).is_empty());
        let events = seq.step_at(&poses::rest(1), t0);
        assert_eq!(events, vec![SessionEvent::SessionStarted]);
        // The trigger frame only starts the session
        assert_eq!(seq.stage(), Stage::Rest);
    }

    #[test]
    fn test_stop_is_not_undone_by_auto_start() {
        let t0 = Instant::now();
        let mut config = CoachConfig::default();
        config.session.auto_start_on_rest_pose = true;
        let mut seq = Sequencer::new(&config, RecordingObserver::default());

        seq.request_start_at(t0);
        seq.step_at(&poses::rest(0), t0);
        seq.request_stop_at(t0 + Duration::from_secs(5));

        // Still standing at rest right after the stop
        let events = seq.step_at(&poses::rest(1), t0 + Duration::from_secs(6));
        assert!(events.is_empty());
        assert!(!seq.is_playing());
        assert!(seq.last_summary().is_some());
        assert_eq!(
            seq.snapshot_at(t0 + Duration::from_secs(30)).elapsed,
            Duration::from_secs(5)
        );

        // Moving out of rest and back re-arms it
        assert!(seq.step_at(&poses::arms_up(2), t0 + Duration::from_secs(7)).is_empty());
        let events = seq.step_at(&poses::rest(3), t0 + Duration::from_secs(8));
        assert_eq!(events, vec![SessionEvent::SessionStarted]);
    }

    #[test]
    fn test_auto_start_disabled_by_default() {
        let mut seq = sequencer();
        assert!(seq.step_at(&poses::rest(0), Instant::now()).is_empty());
        assert!(!seq.is_playing());
    }
}
