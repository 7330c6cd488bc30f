//! Canonical skeletons for the exercise vocabulary
//!
//! Used by the synthetic session generator and by tests. All joints are
//! tracked; the body stands 2 m from the sensor with the hip center at
//! x = 0.

use super::frame::{Frame, FrameBuilder};
use super::joint::{Joint, Side};

/// Distance from the sensor in metres
const DEPTH: f64 = 2.0;
/// Hip-center height in sensor space
pub const HIP_CENTER_Y: f64 = -0.1;
/// Hip-center to ankle length
pub const LEG_LENGTH: f64 = 0.8;
/// Lateral offset of each ankle when standing
const STANCE_HALF_WIDTH: f64 = 0.05;

fn torso(timestamp_ms: u64) -> FrameBuilder {
    Frame::builder(timestamp_ms)
        .tracked(Joint::Head, 0.0, 0.6, DEPTH)
        .tracked(Joint::ShoulderCenter, 0.0, 0.4, DEPTH)
        .tracked(Joint::ShoulderLeft, -0.2, 0.4, DEPTH)
        .tracked(Joint::ShoulderRight, 0.2, 0.4, DEPTH)
        .tracked(Joint::Spine, 0.0, 0.1, DEPTH)
        .tracked(Joint::HipCenter, 0.0, HIP_CENTER_Y, DEPTH)
        .tracked(Joint::HipLeft, -0.1, -0.15, DEPTH)
        .tracked(Joint::HipRight, 0.1, -0.15, DEPTH)
}

fn relaxed_arms(builder: FrameBuilder) -> FrameBuilder {
    builder
        .tracked(Joint::ElbowLeft, -0.2, 0.1, DEPTH)
        .tracked(Joint::ElbowRight, 0.2, 0.1, DEPTH)
        .tracked(Joint::WristLeft, -0.2, -0.15, DEPTH)
        .tracked(Joint::WristRight, 0.2, -0.15, DEPTH)
}

/// Arms lifted above the shoulders, wrists still below the head
fn raised_arms(builder: FrameBuilder) -> FrameBuilder {
    builder
        .tracked(Joint::ElbowLeft, -0.25, 0.5, DEPTH)
        .tracked(Joint::ElbowRight, 0.25, 0.5, DEPTH)
        .tracked(Joint::WristLeft, -0.3, 0.55, DEPTH)
        .tracked(Joint::WristRight, 0.3, 0.55, DEPTH)
}

fn leg(builder: FrameBuilder, side: Side, degrees: f64) -> FrameBuilder {
    let theta = degrees.to_radians();
    let x = side.lateral_sign() * LEG_LENGTH * theta.sin();
    let ankle_y = HIP_CENTER_Y - LEG_LENGTH * theta.cos();
    let knee_y = HIP_CENTER_Y - 0.5 * LEG_LENGTH * theta.cos();
    let (knee, ankle, foot) = match side {
        Side::Left => (Joint::KneeLeft, Joint::AnkleLeft, Joint::FootLeft),
        Side::Right => (Joint::KneeRight, Joint::AnkleRight, Joint::FootRight),
    };
    builder
        .tracked(knee, x / 2.0, knee_y, DEPTH)
        .tracked(ankle, x, ankle_y, DEPTH)
        .tracked(foot, x, ankle_y - 0.05, DEPTH - 0.1)
}

fn standing_legs(builder: FrameBuilder) -> FrameBuilder {
    let lean = (STANCE_HALF_WIDTH / LEG_LENGTH).asin().to_degrees();
    let builder = leg(builder, Side::Left, lean);
    leg(builder, Side::Right, lean)
}

/// Upright, arms hanging by the sides, feet together
pub fn rest(timestamp_ms: u64) -> Frame {
    standing_legs(relaxed_arms(torso(timestamp_ms))).build()
}

/// Both arms raised, feet together
pub fn arms_up(timestamp_ms: u64) -> Frame {
    standing_legs(raised_arms(torso(timestamp_ms))).build()
}

/// Both arms raised with one leg swung out sideways by `degrees`
pub fn arms_up_leg_raised(timestamp_ms: u64, side: Side, degrees: f64) -> Frame {
    let builder = raised_arms(torso(timestamp_ms));
    let lean = (STANCE_HALF_WIDTH / LEG_LENGTH).asin().to_degrees();
    let builder = match side {
        Side::Left => leg(leg(builder, Side::Left, degrees), Side::Right, lean),
        Side::Right => leg(leg(builder, Side::Left, lean), Side::Right, degrees),
    };
    builder.build()
}

/// Arms relaxed with one leg swung out, as when the arms drop mid-cycle
pub fn arms_down_leg_raised(timestamp_ms: u64, side: Side, degrees: f64) -> Frame {
    let builder = relaxed_arms(torso(timestamp_ms));
    let lean = (STANCE_HALF_WIDTH / LEG_LENGTH).asin().to_degrees();
    let builder = match side {
        Side::Left => leg(leg(builder, Side::Left, degrees), Side::Right, lean),
        Side::Right => leg(leg(builder, Side::Left, lean), Side::Right, degrees),
    };
    builder.build()
}
