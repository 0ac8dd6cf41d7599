//! Points and circular interaction zones.

use serde::{Deserialize, Serialize};

/// A tracked nose position for one frame.
///
/// Either axis may be NaN when the tracker lost the subject on that frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A point with no usable coordinates.
    pub fn invalid() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
        }
    }

    /// True when both axes hold finite numbers.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Circular region around an object: its footprint plus the interaction margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionZone {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl InteractionZone {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }
}

/// Returns true iff the squared distance from `point` to the zone center is at
/// most the squared radius. Any NaN operand makes the comparison false.
pub fn is_within_zone(point: Point, zone: &InteractionZone) -> bool {
    let dx = point.x - zone.center_x;
    let dy = point.y - zone.center_y;
    dx * dx + dy * dy <= zone.radius * zone.radius
}
