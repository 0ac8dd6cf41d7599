//! Validated geometric and temporal criteria shared by every trial of a batch.

use crate::core::geometry::InteractionZone;
use serde::{Deserialize, Serialize};

/// Derived, validated inputs for the trial aggregator.
///
/// Built once per batch from [`crate::config::AnalysisConfig::criteria`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionCriteria {
    pub left_zone: InteractionZone,
    pub right_zone: InteractionZone,
    /// Consecutive in-zone frames needed for a bout
    pub required_run_length: u64,
    pub fps: f64,
    pub trial_runtime_secs: f64,
    /// Calibration factor used to size the zones
    pub pixels_per_cm: f64,
    /// Interaction margin added to the object radius
    pub distance_in_pixels: f64,
}

impl InteractionCriteria {
    /// Seconds represented by `frames` at the configured frame rate.
    pub fn frames_to_secs(&self, frames: u64) -> f64 {
        frames as f64 / self.fps
    }
}

/// `floor(fps * threshold_secs)`; fractional frames are not possible.
pub fn required_run_length(fps: u32, interaction_time_ms: u32) -> u64 {
    let threshold_secs = f64::from(interaction_time_ms) / 1000.0;
    (f64::from(fps) * threshold_secs).floor() as u64
}
