//! Geometry predicates over a single frame
//!
//! Pure functions: no state, no side effects. Distance tolerances are
//! absolute sensor units unless scaled by a measured segment length.
//! A predicate that needs a joint the sensor lost evaluates to false.

use crate::config::PoseTolerances;
use crate::skeleton::{Frame, Joint, Side};

const CENTER_LINE: [Joint; 3] = [Joint::Head, Joint::ShoulderCenter, Joint::HipCenter];

/// Both ankles stand within a narrow band under the hip center.
///
/// Requires every joint of the frame to be fully tracked. The band is
/// `d * tan(feet_band) + feet_margin`, where `d` is the vertical drop from
/// hip center to the left ankle; both ankles are tested against it.
pub fn are_feet_together(frame: &Frame, tol: &PoseTolerances) -> bool {
    if !frame.fully_tracked() {
        return false;
    }

    let hip = frame.position(Joint::HipCenter);
    let left = frame.position(Joint::AnkleLeft);
    let right = frame.position(Joint::AnkleRight);

    let drop = hip.y - left.y;
    let band = drop * tol.feet_band_degrees.to_radians().tan() + tol.feet_margin;

    (left.x - hip.x).abs() <= band && (right.x - hip.x).abs() <= band
}

/// Head, shoulder center and hip center stacked vertically, both wrists
/// hanging inside a band below their shoulders.
///
/// The wrist band scales with the shoulder-to-wrist drop; a wrist above its
/// shoulder gives a negative band and fails.
pub fn is_aligned_body_and_arms(frame: &Frame, tol: &PoseTolerances) -> bool {
    let arm_joints = [
        Joint::ShoulderLeft,
        Joint::ShoulderRight,
        Joint::WristLeft,
        Joint::WristRight,
    ];
    if !frame.all_usable(&CENTER_LINE) || !frame.all_usable(&arm_joints) {
        return false;
    }

    let head = frame.position(Joint::Head);
    let shoulders = frame.position(Joint::ShoulderCenter);
    let hip = frame.position(Joint::HipCenter);

    let centered = (head.x - shoulders.x).abs() <= tol.alignment_tolerance
        && (shoulders.x - hip.x).abs() <= tol.alignment_tolerance;
    if !centered {
        return false;
    }

    wrist_hangs_under_shoulder(frame, Side::Left, tol)
        && wrist_hangs_under_shoulder(frame, Side::Right, tol)
}

fn wrist_hangs_under_shoulder(frame: &Frame, side: Side, tol: &PoseTolerances) -> bool {
    let shoulder = frame.position(side.shoulder());
    let wrist = frame.position(side.wrist());

    let band = (shoulder.y - wrist.y) * tol.arm_band_degrees.to_radians().tan();
    (wrist.x - shoulder.x).abs() <= band
}

/// Arm lifted: elbow and wrist at or above the shoulder, wrist below the head
pub fn arm_raised(side: Side, frame: &Frame) -> bool {
    if !frame.all_usable(&[Joint::Head, side.shoulder(), side.elbow(), side.wrist()]) {
        return false;
    }

    let head = frame.position(Joint::Head);
    let shoulder = frame.position(side.shoulder());
    let elbow = frame.position(side.elbow());
    let wrist = frame.position(side.wrist());

    elbow.y >= shoulder.y && wrist.y >= shoulder.y && wrist.y < head.y
}

/// Angle in degrees between vertical and the hip-center-to-ankle segment.
///
/// Ranges over [0, 90]. When the ankle is level with the hip center
/// (vertical separation at or below `min_vertical_separation`) the leg is
/// horizontal and the angle is 90. `None` when either joint is lost.
pub fn leg_angle(side: Side, frame: &Frame, tol: &PoseTolerances) -> Option<f64> {
    if !frame.all_usable(&[Joint::HipCenter, side.ankle()]) {
        return None;
    }

    let hip = frame.position(Joint::HipCenter);
    let ankle = frame.position(side.ankle());

    let rise = (hip.y - ankle.y).abs();
    let reach = (hip.x - ankle.x).abs();

    if rise <= tol.min_vertical_separation {
        return Some(90.0);
    }

    Some((reach / rise).atan().to_degrees())
}

/// Leg swung out to `target_degrees` within a symmetric, exclusive band
pub fn leg_raised_at(
    side: Side,
    frame: &Frame,
    target_degrees: f64,
    tolerance_degrees: f64,
    tol: &PoseTolerances,
) -> bool {
    leg_angle(side, frame, tol)
        .map(|angle| (angle - target_degrees).abs() < tolerance_degrees)
        .unwrap_or(false)
}
