//! Skeleton data model: joints, frames and frame streams
//!
//! # Components
//! - `joint.rs`: Joint identities, sides, tracking tiers, positions
//! - `frame.rs`: Immutable per-instant snapshot
//! - `poses.rs`: Canonical skeletons for the exercise vocabulary
//! - `source.rs`: JSON Lines frame reader/writer

pub mod frame;
pub mod joint;
pub mod poses;
pub mod source;

pub use frame::{Frame, FrameBuilder};
pub use joint::{Joint, JointSample, Position, Side, TrackingState, JOINT_COUNT};
pub use source::{FrameError, FrameReader, FrameWriter};
