//! Named poses of the exercise vocabulary
//!
//! Each pose is a conjunction of geometry predicates. The classifier holds
//! only its tolerances; nothing is remembered between frames.

use serde::Serialize;

use super::geometry;
use crate::config::PoseTolerances;
use crate::skeleton::{Frame, Side};

/// Every vocabulary pose evaluated on one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PoseSet {
    pub rest: bool,
    pub arms_up: bool,
    pub left_leg_up: bool,
    pub right_leg_up: bool,
    pub straight_with_arms_up: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PoseClassifier {
    tolerances: PoseTolerances,
}

impl PoseClassifier {
    pub fn new(tolerances: PoseTolerances) -> Self {
        Self { tolerances }
    }

    pub fn tolerances(&self) -> &PoseTolerances {
        &self.tolerances
    }

    /// Upright with relaxed arms.
    ///
    /// The feet-together result is computed and then discarded: the rest
    /// pose does not currently constrain the legs. Kept as a no-op gate
    /// until product intent for the stance is confirmed.
    pub fn rest_pose(&self, frame: &Frame) -> bool {
        let body = geometry::is_aligned_body_and_arms(frame, &self.tolerances);
        let _feet = geometry::are_feet_together(frame, &self.tolerances);
        let legs = true;
        body && legs
    }

    pub fn arms_up_pose(&self, frame: &Frame) -> bool {
        geometry::arm_raised(Side::Left, frame) && geometry::arm_raised(Side::Right, frame)
    }

    pub fn leg_up_pose(&self, side: Side, frame: &Frame) -> bool {
        geometry::leg_raised_at(
            side,
            frame,
            self.tolerances.leg_target_degrees,
            self.tolerances.leg_tolerance_degrees,
            &self.tolerances,
        )
    }

    /// Bottom of a leg repetition: arms still up, feet back together
    pub fn straight_with_arms_up_pose(&self, frame: &Frame) -> bool {
        self.arms_up_pose(frame) && geometry::are_feet_together(frame, &self.tolerances)
    }

    pub fn classify(&self, frame: &Frame) -> PoseSet {
        PoseSet {
            rest: self.rest_pose(frame),
            arms_up: self.arms_up_pose(frame),
            left_leg_up: self.leg_up_pose(Side::Left, frame),
            right_leg_up: self.leg_up_pose(Side::Right, frame),
            straight_with_arms_up: self.straight_with_arms_up_pose(frame),
        }
    }
}
