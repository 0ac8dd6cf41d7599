//! Bout detection over a sequence of tracked frames.
//!
//! A bout is counted the moment a run of consecutive in-zone frames reaches
//! the required length. Staying longer does not count again; only a frame
//! outside the zone (or a lost frame) resets the run so a new bout can start.

use crate::core::geometry::{is_within_zone, InteractionZone, Point};
use serde::{Deserialize, Serialize};

/// Counters accumulated by one subject/zone pairing over a trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoutState {
    /// Frames where both coordinates were finite
    pub total_frames: u64,
    /// Frames where the point was inside the zone
    pub total_qualifying_frames: u64,
    /// Length of the in-zone streak ending at the last frame
    pub current_run_length: u64,
    /// Number of times a streak reached the required length
    pub bout_count: u64,
}

/// Fold a single frame into `state`.
///
/// The threshold check is an exact equality after the run update. With
/// `required_run_length == 0` that fires on every frame that resets the run,
/// and the count is reported as is.
pub fn process_frame(
    state: BoutState,
    point: Point,
    zone: &InteractionZone,
    required_run_length: u64,
) -> BoutState {
    let mut next = state;

    if point.is_valid() {
        next.total_frames += 1;
    }

    if is_within_zone(point, zone) {
        next.current_run_length += 1;
        next.total_qualifying_frames += 1;
    } else {
        next.current_run_length = 0;
    }

    if next.current_run_length == required_run_length {
        next.bout_count += 1;
    }

    next
}

/// Runs [`process_frame`] against a fixed zone and threshold.
#[derive(Debug, Clone)]
pub struct BoutTracker {
    zone: InteractionZone,
    required_run_length: u64,
    state: BoutState,
}

impl BoutTracker {
    pub fn new(zone: InteractionZone, required_run_length: u64) -> Self {
        Self {
            zone,
            required_run_length,
            state: BoutState::default(),
        }
    }

    /// Process the next frame in trial order.
    pub fn process(&mut self, point: Point) {
        self.state = process_frame(self.state, point, &self.zone, self.required_run_length);
    }

    /// Consume the tracker and return the final counters.
    pub fn finish(self) -> BoutState {
        self.state
    }

    /// Fold a whole sequence of frames from a fresh state.
    pub fn run<I>(zone: InteractionZone, required_run_length: u64, points: I) -> BoutState
    where
        I: IntoIterator<Item = Point>,
    {
        points.into_iter().fold(BoutState::default(), |state, point| {
            process_frame(state, point, &zone, required_run_length)
        })
    }
}
