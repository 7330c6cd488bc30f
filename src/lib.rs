//! Pose Coach - skeleton-driven guided exercise sessions
//!
//! A stream of skeletal frames goes in; stage transitions, repetition
//! counts, score changes and feedback come out.
//!
//! # Layers
//! - `skeleton`: joints, frames, JSON Lines frame streams
//! - `pose`: geometry predicates and the named poses built on them
//! - `session`: stages, scoring, the per-frame sequencer and its observer
//! - `config`: tolerances and session rules from TOML
//! - `cli`: terminal rendering and control keys for the replay binary

pub mod cli;
pub mod config;
pub mod pose;
pub mod session;
pub mod skeleton;

#[cfg(test)]
mod integration_tests;

pub use config::{CoachConfig, ConfigError, PoseTolerances, SessionRules};
pub use pose::{PoseClassifier, PoseSet};
pub use session::{
    NullObserver, RecordingObserver, Sequencer, SessionEvent, SessionObserver, SessionSnapshot,
    SessionSummary, Stage,
};
pub use skeleton::{Frame, FrameError, FrameReader, FrameWriter, Joint, Side, TrackingState};
