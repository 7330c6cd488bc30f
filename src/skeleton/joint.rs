//! Joint identities, body sides and tracking tiers
//!
//! Joints follow the 20-point depth-sensor skeleton minus the hands.
//! Coordinates are sensor space: x lateral, y up, z away from the sensor.

use serde::{Deserialize, Serialize};

/// Number of joints carried by every frame
pub const JOINT_COUNT: usize = 18;

/// Named skeletal landmark
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Head,
    ShoulderCenter,
    ShoulderLeft,
    ShoulderRight,
    ElbowLeft,
    ElbowRight,
    WristLeft,
    WristRight,
    Spine,
    HipCenter,
    HipLeft,
    HipRight,
    KneeLeft,
    KneeRight,
    AnkleLeft,
    AnkleRight,
    FootLeft,
    FootRight,
}

impl Joint {
    /// All joints in index order
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Head,
        Joint::ShoulderCenter,
        Joint::ShoulderLeft,
        Joint::ShoulderRight,
        Joint::ElbowLeft,
        Joint::ElbowRight,
        Joint::WristLeft,
        Joint::WristRight,
        Joint::Spine,
        Joint::HipCenter,
        Joint::HipLeft,
        Joint::HipRight,
        Joint::KneeLeft,
        Joint::KneeRight,
        Joint::AnkleLeft,
        Joint::AnkleRight,
        Joint::FootLeft,
        Joint::FootRight,
    ];

    /// Slot of this joint inside a frame
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Body side used by the side-parameterised predicates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn shoulder(self) -> Joint {
        match self {
            Side::Left => Joint::ShoulderLeft,
            Side::Right => Joint::ShoulderRight,
        }
    }

    pub fn elbow(self) -> Joint {
        match self {
            Side::Left => Joint::ElbowLeft,
            Side::Right => Joint::ElbowRight,
        }
    }

    pub fn wrist(self) -> Joint {
        match self {
            Side::Left => Joint::WristLeft,
            Side::Right => Joint::WristRight,
        }
    }

    pub fn ankle(self) -> Joint {
        match self {
            Side::Left => Joint::AnkleLeft,
            Side::Right => Joint::AnkleRight,
        }
    }

    /// Sign of the lateral direction this side extends towards
    pub fn lateral_sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Tracking confidence tier reported by the sensor, ordered weakest first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    #[default]
    NotTracked,
    Inferred,
    Tracked,
}

/// 3D position in sensor units
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same point reflected across the vertical plane x = 0
    pub fn mirrored(self) -> Self {
        Self { x: -self.x, ..self }
    }
}

impl From<[f64; 3]> for Position {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Position> for [f64; 3] {
    fn from(p: Position) -> Self {
        [p.x, p.y, p.z]
    }
}

/// One joint's reading inside a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    pub position: Position,
    #[serde(default)]
    pub tracking: TrackingState,
}

impl JointSample {
    pub fn tracked(position: Position) -> Self {
        Self {
            position,
            tracking: TrackingState::Tracked,
        }
    }

    /// True unless the sensor lost the joint entirely
    pub fn is_usable(&self) -> bool {
        self.tracking >= TrackingState::Inferred
    }
}
