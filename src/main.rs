//! Pose Coach - replay a recorded skeleton stream through a guided session
//!
//! Frames come from a JSON Lines file and are paced at the recording rate.
//! Interactive mode renders the session in the terminal and takes control
//! keys; headless mode runs as fast as possible and logs events as JSON.

use std::io::{stdout, BufRead, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pose_coach::cli::{summary_lines, Command, Display, DisplayObserver, EventLog, InputHandler};
use pose_coach::{CoachConfig, Frame, FrameError, FrameReader, Sequencer, SessionObserver};

#[derive(Parser, Debug)]
#[command(name = "pose-coach")]
#[command(about = "Guided standing exercise driven by skeletal frames")]
struct Args {
    /// JSON Lines file of skeleton frames
    #[arg(short, long)]
    frames: PathBuf,

    /// TOML file with tolerances and session rules
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay rate in frames per second
    #[arg(long, default_value = "30")]
    fps: f64,

    /// Start the session immediately instead of waiting for `s`
    #[arg(long)]
    start: bool,

    /// Start when the rest pose is detected
    #[arg(long)]
    auto_start: bool,

    /// No terminal UI; print events as JSON Lines and use frame timestamps as the clock
    #[arg(long)]
    headless: bool,

    /// Render in the alternate screen
    #[arg(long)]
    fullscreen: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let default = if debug { "pose_coach=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse errors skip the line; I/O errors end the replay
fn next_frame(item: Result<Frame, FrameError>) -> Result<Option<Frame>> {
    match item {
        Ok(frame) => Ok(Some(frame)),
        Err(e @ FrameError::Parse { .. }) => {
            warn!(error = %e, "skipping malformed frame");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Time between frames; `fps` must lie in 1..=1000
fn frame_interval(fps: f64) -> Result<Duration> {
    if !(1.0..=1000.0).contains(&fps) {
        bail!("--fps must be between 1 and 1000, got {}", fps);
    }
    Ok(Duration::from_secs_f64(1.0 / fps))
}

fn finish<O: SessionObserver>(seq: &mut Sequencer<O>, now: Instant) {
    if seq.is_playing() {
        seq.request_stop_at(now);
    }
}

fn run_headless(
    config: &CoachConfig,
    reader: FrameReader<impl BufRead>,
    start: bool,
) -> Result<Sequencer<EventLog<Stdout>>> {
    let mut seq = Sequencer::new(config, EventLog::new(stdout()));
    let t0 = Instant::now();
    if start {
        seq.request_start_at(t0);
    }

    let mut last = t0;
    for item in reader {
        let Some(frame) = next_frame(item)? else {
            continue;
        };
        last = t0 + Duration::from_millis(frame.timestamp_ms());
        seq.step_at(&frame, last);
    }
    finish(&mut seq, last);
    Ok(seq)
}

fn run_interactive(
    config: &CoachConfig,
    reader: FrameReader<impl BufRead>,
    start: bool,
    fullscreen: bool,
    interval: Duration,
) -> Result<Sequencer<DisplayObserver>> {
    let display = if fullscreen {
        Display::fullscreen()?
    } else {
        Display::simple()?
    };
    display.clear()?;
    display.show_help()?;

    InputHandler::enable_raw_mode()?;
    let mut seq = Sequencer::new(config, DisplayObserver::new(display, config.session.reps_per_leg));
    if start {
        seq.request_start();
    }

    let mut due = Instant::now();
    'replay: for item in reader {
        let Some(frame) = next_frame(item)? else {
            continue;
        };

        // Handle keys until this frame is due
        loop {
            let now = Instant::now();
            if now >= due {
                break;
            }
            match InputHandler::with_timeout(due - now).read_command()? {
                Some(Command::Quit) => break 'replay,
                Some(Command::Start) => {
                    seq.request_start();
                }
                Some(Command::Stop) => {
                    seq.request_stop();
                }
                None => {}
            }
        }

        seq.step(&frame);
        due += interval;
    }

    finish(&mut seq, Instant::now());
    InputHandler::disable_raw_mode()?;
    seq.observer().display().shutdown()?;
    Ok(seq)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let interval = frame_interval(args.fps)?;

    let mut config = match &args.config {
        Some(path) => CoachConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CoachConfig::default(),
    };
    if args.auto_start {
        config.session.auto_start_on_rest_pose = true;
    }
    config.validate()?;

    let reader = FrameReader::open(&args.frames)
        .with_context(|| format!("opening frames {}", args.frames.display()))?;
    info!(frames = %args.frames.display(), fps = args.fps, "replaying");

    let summary = if args.headless {
        let start = args.start || !config.session.auto_start_on_rest_pose;
        let seq = run_headless(&config, reader, start)?;
        seq.last_summary().cloned()
    } else {
        let seq = run_interactive(&config, reader, args.start, args.fullscreen, interval)?;
        seq.last_summary().cloned()
    };

    // Headless stdout carries the event log, keep the report off it
    let lines = match summary {
        Some(summary) => summary_lines(&summary),
        None => vec!["No session was started".to_string()],
    };
    for line in lines {
        if args.headless {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}
