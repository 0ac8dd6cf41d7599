//! Configuration for bout analysis.

use crate::core::criteria::{required_run_length, InteractionCriteria};
use crate::core::geometry::InteractionZone;
use crate::error::{AnalysisError, ConfigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration for an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Object radius as measured in the video, in pixels
    pub object_pixel_radius: u32,

    /// Physical object radius in centimetres
    pub object_cm_radius: f64,

    /// Interaction margin around each object in centimetres
    pub interaction_distance_cm: f64,

    /// Left object reference coordinates
    pub left_object: ObjectPlacement,

    /// Right object reference coordinates
    pub right_object: ObjectPlacement,

    /// Minimum time a subject must stay in a zone for a bout, in milliseconds
    pub interaction_time_ms: u32,

    /// Video frame rate
    pub video_fps: u32,

    /// Configured duration of each trial in seconds
    pub trial_runtime_secs: u32,

    /// Where each subject's nose lives in the tracking export
    pub columns: ColumnLayout,

    /// Default output format for the `analyze` command
    pub output_format: OutputFormat,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            object_pixel_radius: 0,
            object_cm_radius: 0.0,
            interaction_distance_cm: 0.0,
            left_object: ObjectPlacement::default(),
            right_object: ObjectPlacement::default(),
            interaction_time_ms: 0,
            video_fps: 30,
            trial_runtime_secs: 0,
            columns: ColumnLayout::default(),
            output_format: OutputFormat::Csv,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sniff-bout")
            .join("config.json")
    }

    /// Validate the configuration and derive zones and thresholds.
    pub fn criteria(&self) -> Result<InteractionCriteria, AnalysisError> {
        if self.object_pixel_radius == 0 {
            return Err(invalid("object_pixel_radius must be greater than 0"));
        }
        if !self.object_cm_radius.is_finite() || self.object_cm_radius <= 0.0 {
            return Err(invalid("object_cm_radius must be a positive number"));
        }
        if !self.interaction_distance_cm.is_finite() || self.interaction_distance_cm < 0.0 {
            return Err(invalid("interaction_distance_cm must be a non-negative number"));
        }
        if self.video_fps == 0 {
            return Err(invalid("video_fps must be greater than 0"));
        }
        if self.trial_runtime_secs == 0 {
            return Err(invalid("trial_runtime_secs must be greater than 0"));
        }
        self.left_object.validate("left_object")?;
        self.right_object.validate("right_object")?;
        self.columns.validate()?;

        let object_radius = f64::from(self.object_pixel_radius);
        let pixels_per_cm = object_radius / self.object_cm_radius;
        let distance_in_pixels = pixels_per_cm * self.interaction_distance_cm;
        let radius = object_radius + distance_in_pixels;

        Ok(InteractionCriteria {
            left_zone: self.left_object.zone(radius),
            right_zone: self.right_object.zone(radius),
            required_run_length: required_run_length(self.video_fps, self.interaction_time_ms),
            fps: f64::from(self.video_fps),
            trial_runtime_secs: f64::from(self.trial_runtime_secs),
            pixels_per_cm,
            distance_in_pixels,
        })
    }
}

fn invalid(message: &str) -> AnalysisError {
    AnalysisError::InvalidConfiguration(message.to_string())
}

/// An `(x, y)` pair as entered by the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordPair(pub f64, pub f64);

impl FromStr for CoordPair {
    type Err = String;

    /// Accepts `(x, y)`, `[x, y]` or bare `x,y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .or_else(|| {
                trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
            })
            .unwrap_or(trimmed);

        let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();
        if parts.len() != 2 {
            return Err(format!("expected a coordinate pair like (x, y), got '{s}'"));
        }

        let x = parts[0]
            .parse::<f64>()
            .map_err(|e| format!("invalid x in '{s}': {e}"))?;
        let y = parts[1]
            .parse::<f64>()
            .map_err(|e| format!("invalid y in '{s}': {e}"))?;
        Ok(CoordPair(x, y))
    }
}

impl fmt::Display for CoordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Reference points marked on an object in the video frame.
///
/// The zone center takes x from the first element of `top` and y from the
/// second element of `left`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPlacement {
    pub top: CoordPair,
    pub left: CoordPair,
}

impl ObjectPlacement {
    pub fn new(top: CoordPair, left: CoordPair) -> Self {
        Self { top, left }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.top.0, self.left.1)
    }

    fn zone(&self, radius: f64) -> InteractionZone {
        let (x, y) = self.center();
        InteractionZone::new(x, y, radius)
    }

    fn validate(&self, name: &str) -> Result<(), AnalysisError> {
        let (x, y) = self.center();
        if x.is_finite() && y.is_finite() {
            Ok(())
        } else {
            Err(invalid(&format!("{name} coordinates must be finite")))
        }
    }
}

/// Field positions (0-based) of the nose coordinates in a tracking export.
///
/// The defaults match a multi-animal pose export where subject B's nose is
/// the first body part after the frame index and subject A's nose is the
/// fifth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub subject_a_x: usize,
    pub subject_a_y: usize,
    pub subject_b_x: usize,
    pub subject_b_y: usize,
    /// Physical lines consumed as the column header
    pub header_lines: usize,
    /// Table rows after the header that carry metadata rather than frames
    pub skip_rows: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            subject_a_x: 13,
            subject_a_y: 14,
            subject_b_x: 1,
            subject_b_y: 2,
            header_lines: 1,
            skip_rows: 3,
        }
    }
}

impl ColumnLayout {
    fn validate(&self) -> Result<(), AnalysisError> {
        if self.subject_a_x == self.subject_a_y || self.subject_b_x == self.subject_b_y {
            return Err(invalid("x and y columns of a subject must differ"));
        }
        Ok(())
    }

    /// Widest field index the layout reads.
    pub fn max_column(&self) -> usize {
        self.subject_a_x
            .max(self.subject_a_y)
            .max(self.subject_b_x)
            .max(self.subject_b_y)
    }
}

/// Output format for analysis results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            other => Err(format!("unknown output format '{other}' (csv, json or jsonl)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisConfig {
        AnalysisConfig {
            object_pixel_radius: 40,
            object_cm_radius: 4.0,
            interaction_distance_cm: 2.0,
            left_object: ObjectPlacement::new(CoordPair(100.0, 50.0), CoordPair(80.0, 70.0)),
            right_object: ObjectPlacement::new(CoordPair(300.0, 50.0), CoordPair(280.0, 75.0)),
            interaction_time_ms: 100,
            video_fps: 30,
            trial_runtime_secs: 60,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_coord_pair_parsing() {
        assert_eq!("(1, 2)".parse::<CoordPair>(), Ok(CoordPair(1.0, 2.0)));
        assert_eq!(" [3.5,4] ".parse::<CoordPair>(), Ok(CoordPair(3.5, 4.0)));
        assert_eq!("5,6".parse::<CoordPair>(), Ok(CoordPair(5.0, 6.0)));
        assert!("(1, 2, 3)".parse::<CoordPair>().is_err());
        assert!("(a, 2)".parse::<CoordPair>().is_err());
    }

    #[test]
    fn test_criteria_derivation() {
        let criteria = sample().criteria().unwrap();

        assert!((criteria.pixels_per_cm - 10.0).abs() < 1e-12);
        assert!((criteria.distance_in_pixels - 20.0).abs() < 1e-12);
        assert_eq!(criteria.left_zone, InteractionZone::new(100.0, 70.0, 60.0));
        assert_eq!(criteria.right_zone, InteractionZone::new(300.0, 75.0, 60.0));
        assert_eq!(criteria.required_run_length, 3);
    }

    #[test]
    fn test_zero_divisors_rejected() {
        let mut config = sample();
        config.object_cm_radius = 0.0;
        assert!(matches!(
            config.criteria(),
            Err(AnalysisError::InvalidConfiguration(_))
        ));

        let mut config = sample();
        config.trial_runtime_secs = 0;
        assert!(matches!(
            config.criteria(),
            Err(AnalysisError::InvalidConfiguration(_))
        ));

        let mut config = sample();
        config.video_fps = 0;
        assert!(config.criteria().is_err());
    }

    #[test]
    fn test_non_finite_placement_rejected() {
        let mut config = sample();
        config.left_object.top = CoordPair(f64::NAN, 0.0);
        assert!(config.criteria().is_err());
    }

    #[test]
    fn test_config_round_trips_through_file() {
        let dir = std::env::temp_dir().join(format!("sniff-bout-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.json");

        let config = sample();
        config.save_to(&path).unwrap();
        let loaded = AnalysisConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"video_fps": 25}"#).unwrap();
        assert_eq!(config.video_fps, 25);
        assert_eq!(config.columns, ColumnLayout::default());
        assert_eq!(config.output_format, OutputFormat::Csv);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
