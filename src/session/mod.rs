//! Session Management: stage sequencing, scoring, and observer notification
//!
//! # Components
//! - `stage.rs`: Exercise stages and their fixed order
//! - `clock.rs`: Pausable stopwatch with injected time
//! - `state.rs`: SessionState aggregate (stage, reps, latch, score, clock)
//! - `events.rs`: SessionEvent, SessionSnapshot and the SessionObserver trait
//! - `stats.rs`: Per-stage counters and the end-of-session summary
//! - `sequencer.rs`: The per-frame state machine tying it all together

pub mod clock;
pub mod events;
pub mod sequencer;
pub mod stage;
pub mod state;
pub mod stats;

pub use clock::SessionClock;
pub use events::{NullObserver, RecordingObserver, SessionEvent, SessionObserver, SessionSnapshot};
pub use sequencer::Sequencer;
pub use stage::Stage;
pub use state::SessionState;
pub use stats::{SessionStats, SessionSummary, StageStats};
