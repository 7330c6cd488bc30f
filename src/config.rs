//! Tolerances and session rules, loadable from TOML

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must lie strictly between 0 and 90 degrees, got {value}")]
    AngleOutOfRange { field: &'static str, value: f64 },

    #[error("reps_per_leg must be at least 1")]
    NoRepetitions,
}

/// Geometry tolerances used by the pose predicates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseTolerances {
    /// Max lateral offset between head, shoulder center and hip center
    pub alignment_tolerance: f64,
    /// Half-angle of the band a relaxed wrist must hang in
    pub arm_band_degrees: f64,
    /// Half-angle of the band each ankle must stand in
    pub feet_band_degrees: f64,
    /// Absolute margin added to the feet band
    pub feet_margin: f64,
    /// Leg-raise target, measured from vertical
    pub leg_target_degrees: f64,
    pub leg_tolerance_degrees: f64,
    /// Hip-to-ankle vertical separation at or below which the leg counts as horizontal
    pub min_vertical_separation: f64,
}

impl Default for PoseTolerances {
    fn default() -> Self {
        Self {
            alignment_tolerance: 0.05,
            arm_band_degrees: 9.0,
            feet_band_degrees: 4.5,
            feet_margin: 0.05,
            leg_target_degrees: 40.0,
            leg_tolerance_degrees: 5.0,
            min_vertical_separation: 1e-4,
        }
    }
}

/// Scoring and progression rules
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRules {
    pub starting_score: i32,
    /// Full up/down cycles required on each leg
    pub reps_per_leg: u32,
    pub clamp_score_at_zero: bool,
    /// Start a session when an idle user holds the rest pose
    pub auto_start_on_rest_pose: bool,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            starting_score: 10,
            reps_per_leg: 4,
            clamp_score_at_zero: false,
            auto_start_on_rest_pose: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    pub pose: PoseTolerances,
    pub session: SessionRules,
}

impl CoachConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: CoachConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pose;
        for (field, value) in [
            ("alignment_tolerance", p.alignment_tolerance),
            ("leg_tolerance_degrees", p.leg_tolerance_degrees),
            ("min_vertical_separation", p.min_vertical_separation),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if p.feet_margin < 0.0 {
            return Err(ConfigError::NotPositive {
                field: "feet_margin",
                value: p.feet_margin,
            });
        }
        for (field, value) in [
            ("arm_band_degrees", p.arm_band_degrees),
            ("feet_band_degrees", p.feet_band_degrees),
            ("leg_target_degrees", p.leg_target_degrees),
        ] {
            if value <= 0.0 || value >= 90.0 {
                return Err(ConfigError::AngleOutOfRange { field, value });
            }
        }
        if self.session.reps_per_leg == 0 {
            return Err(ConfigError::NoRepetitions);
        }
        Ok(())
    }
}
