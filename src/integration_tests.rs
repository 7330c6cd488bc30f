//! End-to-end sessions driven through the public sequencer API

use std::io::Cursor;
use std::time::{Duration, Instant};

use crate::config::CoachConfig;
use crate::session::{RecordingObserver, Sequencer, SessionEvent, Stage};
use crate::skeleton::{poses, Frame, FrameReader, FrameWriter, Side};

const FRAME: Duration = Duration::from_millis(33);

/// Feeds frames at a steady 30 fps, starting one frame after `t0`
struct Driver {
    seq: Sequencer<RecordingObserver>,
    t0: Instant,
    tick: u32,
}

impl Driver {
    fn new(config: &CoachConfig) -> Self {
        Self {
            seq: Sequencer::new(config, RecordingObserver::default()),
            t0: Instant::now(),
            tick: 0,
        }
    }

    fn now(&self) -> Instant {
        self.t0 + FRAME * self.tick
    }

    fn start(&mut self) -> Vec<SessionEvent> {
        let now = self.now();
        self.seq.request_start_at(now)
    }

    fn feed(&mut self, frame: &Frame) -> Vec<SessionEvent> {
        self.tick += 1;
        let now = self.now();
        self.seq.step_at(frame, now)
    }

    fn leg_rep(&mut self, side: Side) -> Vec<SessionEvent> {
        let mut events = self.feed(&poses::arms_up_leg_raised(0, side, 40.0));
        events.extend(self.feed(&poses::arms_up(0)));
        events
    }

    fn events(&self) -> &[SessionEvent] {
        &self.seq.observer().events
    }
}

fn full_session_frames() -> Vec<Frame> {
    let mut frames = vec![poses::rest(0), poses::arms_up(0)];
    for side in [Side::Left, Side::Right] {
        for _ in 0..4 {
            frames.push(poses::arms_up_leg_raised(0, side, 40.0));
            frames.push(poses::arms_up(0));
        }
    }
    frames.push(poses::rest(0));
    frames
        .into_iter()
        .enumerate()
        .map(|(i, f)| f.with_timestamp(i as u64 * 33))
        .collect()
}

#[test]
fn test_left_leg_cycle_advances_after_four_reps() {
    let mut d = Driver::new(&CoachConfig::default());
    d.start();
    assert_eq!(d.seq.stage(), Stage::Rest);
    assert_eq!(d.seq.state().score, 10);

    d.feed(&poses::rest(0));
    assert_eq!(d.seq.stage(), Stage::ArmsRaised);
    assert_eq!(d.seq.state().score, 10);

    d.feed(&poses::arms_up(0));
    assert_eq!(d.seq.stage(), Stage::LeftLegCycle);

    d.feed(&poses::arms_up_leg_raised(0, Side::Left, 40.0));
    assert!(d.seq.state().at_top);
    assert_eq!(d.seq.state().repetitions, 0);

    d.feed(&poses::arms_up(0));
    assert_eq!(d.seq.state().repetitions, 1);
    assert!(!d.seq.state().at_top);

    d.leg_rep(Side::Left);
    d.leg_rep(Side::Left);
    let events = d.leg_rep(Side::Left);
    assert_eq!(
        events,
        vec![
            SessionEvent::RepetitionCounted { count: 4 },
            SessionEvent::StageAdvanced {
                from: Stage::LeftLegCycle,
                to: Stage::RightLegCycle,
            },
        ]
    );
    assert_eq!(d.seq.stage(), Stage::RightLegCycle);
    assert_eq!(d.seq.state().repetitions, 0);
}

#[test]
fn test_arms_down_mid_cycle_regresses() {
    let mut d = Driver::new(&CoachConfig::default());
    d.start();
    d.feed(&poses::rest(0));
    d.feed(&poses::arms_up(0));
    d.leg_rep(Side::Left);
    d.feed(&poses::arms_up_leg_raised(0, Side::Left, 40.0));
    assert_eq!(d.seq.state().repetitions, 1);
    assert!(d.seq.state().at_top);

    let events = d.feed(&poses::rest(0));
    assert_eq!(events, vec![SessionEvent::RegressedWithPenalty { score: 9 }]);
    let state = d.seq.state();
    assert_eq!(state.stage, Stage::Rest);
    assert_eq!(state.repetitions, 0);
    assert_eq!(state.score, 9);
    assert!(!state.at_top);
    assert!(state.playing);
}

#[test]
fn test_full_session_ends_once() {
    let mut d = Driver::new(&CoachConfig::default());
    d.start();
    for frame in full_session_frames() {
        d.feed(&frame);
    }

    let ended = d.seq.observer().count(|e| *e == SessionEvent::SessionEnded);
    assert_eq!(ended, 1);
    assert!(!d.seq.is_playing());
    assert_eq!(d.seq.stage(), Stage::Idle);

    // Stage transitions arrive in order
    let advanced: Vec<Stage> = d
        .events()
        .iter()
        .filter_map(|e| match e {
            SessionEvent::StageAdvanced { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        advanced,
        vec![
            Stage::ArmsRaised,
            Stage::LeftLegCycle,
            Stage::RightLegCycle,
            Stage::ReturnToRest,
            Stage::Complete,
        ]
    );
    assert_eq!(d.events().last(), Some(&SessionEvent::SessionEnded));

    // Extra rest frames after the end change nothing
    assert!(d.feed(&poses::rest(0)).is_empty());
    assert_eq!(d.seq.observer().count(|e| *e == SessionEvent::SessionEnded), 1);
}

#[test]
fn test_final_state_stays_readable() {
    let mut d = Driver::new(&CoachConfig::default());
    d.start();
    for frame in full_session_frames() {
        d.feed(&frame);
    }
    let ended_at = d.now();
    let snap = d.seq.snapshot_at(ended_at + Duration::from_secs(60));
    assert_eq!(snap.score, 10);
    assert_eq!(snap.elapsed, ended_at - d.t0);
    assert!(!snap.playing);

    let summary = d.seq.last_summary().unwrap();
    assert!(summary.completed);
    assert_eq!(summary.final_score, 10);
    assert_eq!(summary.repetitions, 8);
    assert_eq!(summary.regressions, 0);
    assert_eq!(summary.total_frames, full_session_frames().len() as u64);
}

#[test]
fn test_repetitions_never_exceed_target() {
    let mut d = Driver::new(&CoachConfig::default());
    d.start();
    d.feed(&poses::rest(0));
    d.feed(&poses::arms_up(0));
    for _ in 0..20 {
        d.leg_rep(Side::Left);
        assert!(d.seq.state().repetitions < 4);
    }
    // Past the left stage, extra left reps latch nothing
    assert_eq!(d.seq.stage(), Stage::RightLegCycle);
    let counted = d
        .seq
        .observer()
        .count(|e| matches!(e, SessionEvent::RepetitionCounted { .. }));
    assert_eq!(counted, 4);
}

#[test]
fn test_regression_then_recovery_completes() {
    let mut d = Driver::new(&CoachConfig::default());
    d.start();
    d.feed(&poses::rest(0));
    d.feed(&poses::arms_up(0));
    d.leg_rep(Side::Left);
    d.feed(&poses::arms_down_leg_raised(0, Side::Left, 40.0));
    assert_eq!(d.seq.stage(), Stage::Rest);

    for frame in full_session_frames() {
        d.feed(&frame);
    }
    assert_eq!(d.seq.stage(), Stage::Idle);
    let summary = d.seq.last_summary().unwrap();
    assert_eq!(summary.final_score, 9);
    assert_eq!(summary.regressions, 1);
    assert_eq!(d.seq.stats().hardest_stage(), Some((Stage::LeftLegCycle, 1)));
}

#[test]
fn test_replay_from_json_lines() {
    let mut buf = Vec::new();
    {
        let mut writer = FrameWriter::new(&mut buf);
        for frame in full_session_frames() {
            writer.write(&frame).unwrap();
        }
        writer.flush().unwrap();
    }

    let mut d = Driver::new(&CoachConfig::default());
    d.start();
    for frame in FrameReader::new(Cursor::new(buf)) {
        d.feed(&frame.unwrap());
    }
    assert_eq!(d.events().last(), Some(&SessionEvent::SessionEnded));
}

#[test]
fn test_auto_start_needs_fresh_rest_pose() {
    let mut config = CoachConfig::default();
    config.session.auto_start_on_rest_pose = true;
    let mut d = Driver::new(&config);

    let events = d.feed(&poses::rest(0));
    assert_eq!(events, vec![SessionEvent::SessionStarted]);
    for frame in full_session_frames() {
        d.feed(&frame);
    }
    assert!(!d.seq.is_playing());

    // Still standing at rest after finishing: no restart
    assert!(d.feed(&poses::rest(0)).is_empty());
    assert!(!d.seq.is_playing());

    d.feed(&poses::arms_up(0));
    assert_eq!(d.feed(&poses::rest(0)), vec![SessionEvent::SessionStarted]);
}

#[test]
fn test_mirrored_session_behaves_the_same() {
    let mut plain = Driver::new(&CoachConfig::default());
    let mut mirrored = Driver::new(&CoachConfig::default());
    plain.start();
    mirrored.start();

    for frame in full_session_frames() {
        let a = plain.feed(&frame);
        let b = mirrored.feed(&frame.mirrored_x());
        assert_eq!(a, b);
    }
    assert_eq!(plain.events(), mirrored.events());
}
