//! Terminal display and UI rendering
//!
//! Features:
//! - Current stage with its instruction line
//! - Repetition progress, score and elapsed time
//! - Latest feedback message, color coded by event
//! - `DisplayObserver` adapter so the sequencer drives rendering

use std::io::{self, stdout, Write};
use std::time::Duration;

use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use tracing::warn;

use crate::session::{SessionEvent, SessionObserver, SessionSnapshot, Stage};

/// Terminal display manager
pub struct Display {
    /// Whether we're using alternate screen
    use_alternate_screen: bool,
}

impl Display {
    /// Draw over the current screen, leaving the output in scrollback
    pub fn simple() -> io::Result<Self> {
        Ok(Display {
            use_alternate_screen: false,
        })
    }

    /// Full-screen mode, restored on shutdown
    pub fn fullscreen() -> io::Result<Self> {
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Display {
            use_alternate_screen: true,
        })
    }

    /// Clear screen
    pub fn clear(&self) -> io::Result<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(())
    }

    /// Stage name and what the user should do now
    pub fn show_stage(&self, stage: Stage) -> io::Result<()> {
        let mut stdout = stdout();
        let label = match stage.index() {
            Some(i) => format!("Exercise {}/5", i + 1),
            None => "Waiting".to_string(),
        };

        execute!(
            stdout,
            cursor::MoveTo(0, 1),
            SetForegroundColor(Color::Cyan),
            Print(label),
            ResetColor,
            Print(format!("  {:?}\n", stage)),
            cursor::MoveTo(0, 2),
            Print(stage.instruction()),
            Print("\n")
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Repetitions, score and stopwatch
    pub fn show_progress(&self, snapshot: &SessionSnapshot, reps_per_leg: u32) -> io::Result<()> {
        let mut stdout = stdout();

        let reps = if snapshot.stage.leg_side().is_some() {
            let marker = if snapshot.at_top { " (up)" } else { "" };
            format!("{}/{}{}", snapshot.repetitions, reps_per_leg, marker)
        } else {
            "-".to_string()
        };

        execute!(
            stdout,
            cursor::MoveTo(0, 4),
            SetForegroundColor(Color::Magenta),
            Print("Reps: "),
            ResetColor,
            Print(reps),
            Print("  |  Score: "),
            SetForegroundColor(score_color(snapshot.score)),
            Print(snapshot.score),
            ResetColor,
            Print(format!("  |  Time: {}", format_elapsed(snapshot.elapsed))),
            Print(if snapshot.playing { "" } else { "  (paused)" }),
            Print("\n")
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Latest feedback line
    pub fn show_feedback(&self, event: &SessionEvent) -> io::Result<()> {
        let mut stdout = stdout();
        let color = match event {
            SessionEvent::RegressedWithPenalty { .. } => Color::Red,
            SessionEvent::RepetitionCounted { .. } => Color::Yellow,
            SessionEvent::SessionStopped => Color::DarkGrey,
            _ => Color::Green,
        };

        execute!(
            stdout,
            cursor::MoveTo(0, 6),
            SetForegroundColor(Color::Blue),
            Print("─".repeat(50)),
            Print("\n"),
            ResetColor,
            SetForegroundColor(color),
            Print(event.feedback()),
            ResetColor,
            Print("\n")
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Show help text
    pub fn show_help(&self) -> io::Result<()> {
        let mut stdout = stdout();

        execute!(
            stdout,
            cursor::MoveTo(0, 9),
            SetForegroundColor(Color::DarkGrey),
            Print("s start  |  x stop  |  Esc or Ctrl+C to exit\n"),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&self) -> io::Result<()> {
        let mut stdout = stdout();

        if self.use_alternate_screen {
            execute!(stdout, LeaveAlternateScreen, cursor::Show,)?;
        }

        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}

fn score_color(score: i32) -> Color {
    if score >= 8 {
        Color::Green
    } else if score >= 5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// `mm:ss`, hours folded into minutes
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Renders every state change the sequencer publishes
pub struct DisplayObserver {
    display: Display,
    reps_per_leg: u32,
    last_event: Option<SessionEvent>,
}

impl DisplayObserver {
    pub fn new(display: Display, reps_per_leg: u32) -> Self {
        Self {
            display,
            reps_per_leg,
            last_event: None,
        }
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    fn render(&self, snapshot: &SessionSnapshot) -> io::Result<()> {
        self.display.clear()?;
        self.display.show_stage(snapshot.stage)?;
        self.display.show_progress(snapshot, self.reps_per_leg)?;
        if let Some(event) = &self.last_event {
            self.display.show_feedback(event)?;
        }
        self.display.show_help()
    }
}

impl SessionObserver for DisplayObserver {
    fn on_state_changed(&mut self, snapshot: &SessionSnapshot) {
        if let Err(e) = self.render(snapshot) {
            warn!(error = %e, "render failed");
        }
    }

    fn on_event(&mut self, event: &SessionEvent) {
        self.last_event = Some(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(65_900)), "01:05");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "62:05");
    }

    #[test]
    fn test_score_color_bands() {
        assert_eq!(score_color(10), Color::Green);
        assert_eq!(score_color(6), Color::Yellow);
        assert_eq!(score_color(-1), Color::Red);
    }
}
