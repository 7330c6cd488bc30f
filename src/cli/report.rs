//! Headless output: JSON Lines event log and the end-of-session report

use std::io::{self, Write};

use serde::Serialize;
use tracing::warn;

use super::display::format_elapsed;
use crate::session::{SessionEvent, SessionObserver, SessionSnapshot, SessionSummary, Stage};

#[derive(Serialize)]
struct LogLine<'a> {
    stage: Stage,
    repetitions: u32,
    score: i32,
    event: &'a SessionEvent,
}

/// Writes one JSON object per event, tagged with the state it left behind
pub struct EventLog<W: Write> {
    out: W,
    last: Option<SessionSnapshot>,
    pending: Vec<SessionEvent>,
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            pending: Vec::new(),
        }
    }

    fn write_pending(&mut self) -> io::Result<()> {
        let Some(snapshot) = self.last else {
            return Ok(());
        };
        for event in self.pending.drain(..) {
            let line = LogLine {
                stage: snapshot.stage,
                repetitions: snapshot.repetitions,
                score: snapshot.score,
                event: &event,
            };
            serde_json::to_writer(&mut self.out, &line)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SessionObserver for EventLog<W> {
    fn on_state_changed(&mut self, snapshot: &SessionSnapshot) {
        self.last = Some(*snapshot);
        if let Err(e) = self.write_pending() {
            warn!(error = %e, "event log write failed");
        }
    }

    fn on_event(&mut self, event: &SessionEvent) {
        self.pending.push(event.clone());
    }
}

/// Plain-text summary for the end of a run
pub fn summary_lines(summary: &SessionSummary) -> Vec<String> {
    let mut lines = vec![
        if summary.completed {
            "Session complete!".to_string()
        } else {
            "Session stopped before the end".to_string()
        },
        format!(
            "Final score: {} | Repetitions: {} | Regressions: {} | Time: {}",
            summary.final_score,
            summary.repetitions,
            summary.regressions,
            format_elapsed(summary.elapsed)
        ),
    ];
    for (stage, frames) in &summary.frames_per_stage {
        lines.push(format!("  {:?}: {} frames", stage, frames));
    }
    lines
}
