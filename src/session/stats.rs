//! Per-stage session statistics
//!
//! Tracks:
//! - Frames spent in each stage
//! - Regressions (arms lost) per leg stage
//! - Latch sets, so flicker at the top of a repetition shows up
//! - Final summary once a session ends

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::stage::Stage;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageStats {
    pub frames: u64,
    pub regressions: u32,
    pub latch_sets: u32,
    pub repetitions: u32,
}

/// Accumulates statistics across one session
#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    per_stage: FxHashMap<Stage, StageStats>,
    total_frames: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, stage: Stage) {
        self.total_frames += 1;
        self.per_stage.entry(stage).or_default().frames += 1;
    }

    pub fn record_regression(&mut self, from: Stage) {
        self.per_stage.entry(from).or_default().regressions += 1;
    }

    pub fn record_latch(&mut self, stage: Stage) {
        self.per_stage.entry(stage).or_default().latch_sets += 1;
    }

    pub fn record_repetition(&mut self, stage: Stage) {
        self.per_stage.entry(stage).or_default().repetitions += 1;
    }

    pub fn stage(&self, stage: Stage) -> StageStats {
        self.per_stage.get(&stage).copied().unwrap_or_default()
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn total_regressions(&self) -> u32 {
        self.per_stage.values().map(|s| s.regressions).sum()
    }

    pub fn total_repetitions(&self) -> u32 {
        self.per_stage.values().map(|s| s.repetitions).sum()
    }

    /// Stage where the user lost the pose most often
    pub fn hardest_stage(&self) -> Option<(Stage, u32)> {
        self.per_stage
            .iter()
            .filter(|(_, s)| s.regressions > 0)
            .max_by_key(|&(&stage, s)| (s.regressions, stage.index()))
            .map(|(&stage, s)| (stage, s.regressions))
    }

    pub fn summarize(&self, completed: bool, final_score: i32, elapsed: Duration) -> SessionSummary {
        let frames_per_stage = Stage::SEQUENCE
            .iter()
            .map(|&stage| (stage, self.stage(stage).frames))
            .filter(|&(_, frames)| frames > 0)
            .collect();

        SessionSummary {
            completed,
            final_score,
            elapsed,
            total_frames: self.total_frames,
            repetitions: self.total_repetitions(),
            regressions: self.total_regressions(),
            frames_per_stage,
        }
    }

    pub fn reset(&mut self) {
        self.per_stage.clear();
        self.total_frames = 0;
    }
}

/// End-of-session report
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    /// False when the session was stopped before completing
    pub completed: bool,
    pub final_score: i32,
    pub elapsed: Duration,
    pub total_frames: u64,
    /// Repetitions counted, including any lost to a regression
    pub repetitions: u32,
    pub regressions: u32,
    pub frames_per_stage: Vec<(Stage, u64)>,
}
