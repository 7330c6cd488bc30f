//! Synthetic session generator
//!
//! Writes a scripted exercise run as JSON Lines frames built from the
//! canonical poses, with optional positional jitter and tracking dropout.
//! Usage: cargo run --bin synth -- --output session.jsonl --hold 15 --jitter 0.005

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pose_coach::skeleton::{poses, Frame, FrameWriter, Joint, JointSample, Position, Side};
use pose_coach::TrackingState;

#[derive(Parser, Debug)]
#[command(name = "synth")]
#[command(about = "Generate a synthetic skeleton recording of one exercise session")]
struct Args {
    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frames each scripted pose is held for
    #[arg(long, default_value = "10")]
    hold: u32,

    /// Recording rate used for timestamps
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Repetitions per leg
    #[arg(short, long, default_value = "4")]
    reps: u32,

    /// Leg raise angle in degrees
    #[arg(long, default_value = "40")]
    leg_degrees: f64,

    /// Max uniform offset added to every coordinate
    #[arg(long, default_value = "0")]
    jitter: f64,

    /// Probability that a joint reading is lost in a frame
    #[arg(long, default_value = "0")]
    dropout: f64,

    /// Drop the arms once during the left leg cycle
    #[arg(long)]
    regress: bool,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    Rest,
    ArmsUp,
    LegUp(Side),
    ArmsDown(Side),
}

/// Pose order for one full session
fn script(reps: u32, regress: bool) -> Vec<Step> {
    let mut steps = vec![Step::Rest, Step::ArmsUp];

    if regress {
        steps.extend([
            Step::LegUp(Side::Left),
            Step::ArmsUp,
            Step::ArmsDown(Side::Left),
            Step::Rest,
            Step::ArmsUp,
        ]);
    }

    for side in [Side::Left, Side::Right] {
        for _ in 0..reps {
            steps.push(Step::LegUp(side));
            steps.push(Step::ArmsUp);
        }
    }
    steps.push(Step::Rest);
    steps
}

fn pose(step: Step, timestamp_ms: u64, leg_degrees: f64) -> Frame {
    match step {
        Step::Rest => poses::rest(timestamp_ms),
        Step::ArmsUp => poses::arms_up(timestamp_ms),
        Step::LegUp(side) => poses::arms_up_leg_raised(timestamp_ms, side, leg_degrees),
        Step::ArmsDown(side) => poses::arms_down_leg_raised(timestamp_ms, side, leg_degrees),
    }
}

/// Sensor noise: jitter every position, lose some joints entirely
fn perturb(frame: Frame, rng: &mut StdRng, jitter: f64, dropout: f64) -> Frame {
    let mut frame = frame;
    for joint in Joint::ALL {
        let sample = frame.sample(joint);
        let mut position = sample.position;
        if jitter > 0.0 {
            position = Position::new(
                position.x + rng.gen_range(-jitter..=jitter),
                position.y + rng.gen_range(-jitter..=jitter),
                position.z + rng.gen_range(-jitter..=jitter),
            );
        }
        let tracking = if dropout > 0.0 && rng.gen_bool(dropout) {
            TrackingState::NotTracked
        } else {
            sample.tracking
        };
        frame = frame.with_sample(joint, JointSample { position, tracking });
    }
    frame
}

fn generate(args: &Args) -> Vec<Frame> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let frame_ms = 1000 / u64::from(args.fps);
    let mut frames = Vec::new();

    for step in script(args.reps, args.regress) {
        for _ in 0..args.hold {
            let timestamp_ms = frames.len() as u64 * frame_ms;
            let frame = pose(step, timestamp_ms, args.leg_degrees);
            frames.push(perturb(frame, &mut rng, args.jitter, args.dropout));
        }
    }
    frames
}

fn write_frames<W: Write>(out: W, frames: &[Frame]) -> Result<()> {
    let mut writer = FrameWriter::new(out);
    for frame in frames {
        writer.write(frame)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    if args.fps == 0 || args.fps > 1000 {
        bail!("--fps must be between 1 and 1000, got {}", args.fps);
    }
    if !(0.0..=1.0).contains(&args.dropout) {
        bail!("--dropout must be a probability, got {}", args.dropout);
    }
    if !(args.jitter >= 0.0 && args.jitter.is_finite()) {
        bail!("--jitter must be a non-negative number, got {}", args.jitter);
    }

    let frames = generate(&args);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_frames(BufWriter::new(file), &frames)?;
            info!(frames = frames.len(), path = %path.display(), "session written");
        }
        None => write_frames(io::stdout().lock(), &frames)?,
    }

    Ok(())
}
