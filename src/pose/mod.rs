//! Pose classification
//!
//! # Components
//! - `geometry.rs`: Tolerance-bounded predicates over joint positions
//! - `classifier.rs`: Named poses composed from the predicates

pub mod classifier;
pub mod geometry;

pub use classifier::{PoseClassifier, PoseSet};
