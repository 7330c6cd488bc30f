//! Immutable per-instant skeleton snapshot

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::joint::{Joint, JointSample, Position, TrackingState, JOINT_COUNT};

/// Joint positions and tracking tiers for one sampled instant.
///
/// Every joint has a slot; joints the source did not report are
/// `NotTracked` at the origin. A frame cannot be mutated once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "FrameRecord", into = "FrameRecord")]
pub struct Frame {
    timestamp_ms: u64,
    joints: [JointSample; JOINT_COUNT],
}

impl Frame {
    pub fn builder(timestamp_ms: u64) -> FrameBuilder {
        FrameBuilder::new(timestamp_ms)
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn sample(&self, joint: Joint) -> JointSample {
        self.joints[joint.index()]
    }

    pub fn position(&self, joint: Joint) -> Position {
        self.joints[joint.index()].position
    }

    pub fn tracking(&self, joint: Joint) -> TrackingState {
        self.joints[joint.index()].tracking
    }

    /// True when every listed joint is at least inferred
    pub fn all_usable(&self, joints: &[Joint]) -> bool {
        joints.iter().all(|&j| self.sample(j).is_usable())
    }

    /// True when every joint in the frame is fully tracked
    pub fn fully_tracked(&self) -> bool {
        self.joints
            .iter()
            .all(|s| s.tracking == TrackingState::Tracked)
    }

    /// Mirror image across x = 0 with left and right joints kept in place
    pub fn mirrored_x(&self) -> Frame {
        let mut joints = self.joints;
        for sample in joints.iter_mut() {
            sample.position = sample.position.mirrored();
        }
        Frame {
            timestamp_ms: self.timestamp_ms,
            joints,
        }
    }

    /// Rebuild this frame with one joint replaced
    pub fn with_sample(&self, joint: Joint, sample: JointSample) -> Frame {
        let mut joints = self.joints;
        joints[joint.index()] = sample;
        Frame {
            timestamp_ms: self.timestamp_ms,
            joints,
        }
    }

    pub fn with_timestamp(&self, timestamp_ms: u64) -> Frame {
        Frame {
            timestamp_ms,
            joints: self.joints,
        }
    }
}

/// Incremental frame construction
#[derive(Clone, Debug)]
pub struct FrameBuilder {
    timestamp_ms: u64,
    joints: [JointSample; JOINT_COUNT],
}

impl FrameBuilder {
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            joints: [JointSample::default(); JOINT_COUNT],
        }
    }

    pub fn joint(mut self, joint: Joint, position: Position, tracking: TrackingState) -> Self {
        self.joints[joint.index()] = JointSample { position, tracking };
        self
    }

    pub fn tracked(self, joint: Joint, x: f64, y: f64, z: f64) -> Self {
        self.joint(joint, Position::new(x, y, z), TrackingState::Tracked)
    }

    pub fn build(self) -> Frame {
        Frame {
            timestamp_ms: self.timestamp_ms,
            joints: self.joints,
        }
    }
}

/// Wire form: joints keyed by name, absent joints omitted
#[derive(Clone, Debug, Serialize, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    timestamp_ms: u64,
    #[serde(default)]
    joints: BTreeMap<Joint, JointSample>,
}

impl From<FrameRecord> for Frame {
    fn from(record: FrameRecord) -> Self {
        let mut joints = [JointSample::default(); JOINT_COUNT];
        for (joint, sample) in record.joints {
            joints[joint.index()] = sample;
        }
        Frame {
            timestamp_ms: record.timestamp_ms,
            joints,
        }
    }
}

impl From<Frame> for FrameRecord {
    fn from(frame: Frame) -> Self {
        let joints = Joint::ALL
            .iter()
            .filter(|&&j| frame.tracking(j) != TrackingState::NotTracked)
            .map(|&j| (j, frame.sample(j)))
            .collect();
        FrameRecord {
            timestamp_ms: frame.timestamp_ms,
            joints,
        }
    }
}
