//! Per-trial aggregation of the four subject/zone pairings.
//!
//! Each trial feeds every frame to four trackers:
//!
//! | tracker        | points    | zone  |
//! |----------------|-----------|-------|
//! | primary left   | subject A | left  |
//! | primary right  | subject B | right |
//! | missed left    | subject B | left  |
//! | missed right   | subject A | right |
//!
//! The cross ("missed") pairings catch recordings where the tracker swapped
//! identities. Per side, when the primary bout count is not greater than the
//! missed one, the missed bout count and qualifying frames are reported
//! instead. The frame total always comes from the primary tracker, so after a
//! substitution the frame percentage mixes two pairings.

use crate::core::bout::{BoutState, BoutTracker};
use crate::core::criteria::InteractionCriteria;
use crate::input::FrameRow;
use serde::{Deserialize, Serialize};

/// Which tracker supplied the reported bout count and qualifying frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountSource {
    Primary,
    Missed,
}

/// Object side of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// 1-based subject number used in output keys.
    pub fn subject_number(self) -> usize {
        match self {
            Side::Left => 1,
            Side::Right => 2,
        }
    }
}

/// Final counters of both pairings for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideCounts {
    pub primary: BoutState,
    pub missed: BoutState,
}

/// Counts chosen for a side after the max-bouts rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub bout_count: u64,
    pub total_qualifying_frames: u64,
    /// Never replaced by the missed pairing
    pub total_frames: u64,
    pub source: CountSource,
}

/// Apply the max-bouts rule. Ties go to the missed pairing.
pub fn reconcile(counts: &SideCounts) -> Reconciled {
    let SideCounts { primary, missed } = counts;

    if primary.bout_count <= missed.bout_count {
        Reconciled {
            bout_count: missed.bout_count,
            total_qualifying_frames: missed.total_qualifying_frames,
            total_frames: primary.total_frames,
            source: CountSource::Missed,
        }
    } else {
        Reconciled {
            bout_count: primary.bout_count,
            total_qualifying_frames: primary.total_qualifying_frames,
            total_frames: primary.total_frames,
            source: CountSource::Primary,
        }
    }
}

/// Summary for one subject in one trial. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    /// 1-based trial number
    pub trial: usize,
    /// 1-based subject number (1 = left, 2 = right)
    pub subject: usize,
    pub bout_count: u64,
    pub total_qualifying_frames: u64,
    pub qualifying_secs: f64,
    pub percent_qualifying_frames: f64,
    pub percent_qualifying_time: f64,
    /// Valid frames seen by the primary pairing
    pub total_frames: u64,
    pub source: CountSource,
}

impl TrialSummary {
    /// Derive the reported fields from reconciled counts.
    pub fn from_reconciled(
        trial: usize,
        side: Side,
        reconciled: &Reconciled,
        criteria: &InteractionCriteria,
    ) -> Self {
        let qualifying_secs = criteria.frames_to_secs(reconciled.total_qualifying_frames);

        let percent_qualifying_frames = if reconciled.total_frames == 0 {
            tracing::warn!(
                trial,
                subject = side.subject_number(),
                "No valid frames for subject; reporting 0% qualifying frames"
            );
            0.0
        } else {
            reconciled.total_qualifying_frames as f64 / reconciled.total_frames as f64 * 100.0
        };

        Self {
            trial,
            subject: side.subject_number(),
            bout_count: reconciled.bout_count,
            total_qualifying_frames: reconciled.total_qualifying_frames,
            qualifying_secs,
            percent_qualifying_frames,
            percent_qualifying_time: qualifying_secs / criteria.trial_runtime_secs * 100.0,
            total_frames: reconciled.total_frames,
            source: reconciled.source,
        }
    }

    /// Row key, e.g. `trial_3_subject_2`.
    pub fn key(&self) -> String {
        format!("trial_{}_subject_{}", self.trial, self.subject)
    }
}

/// Everything produced by one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub trial: usize,
    pub left: SideCounts,
    pub right: SideCounts,
    pub summaries: [TrialSummary; 2],
    /// Rows where at least one subject could not be read
    pub invalid_rows: u64,
    pub rows: u64,
}

/// Folds one trial's frames through the four pairings.
pub struct TrialAggregator {
    trial: usize,
    criteria: InteractionCriteria,
    primary_left: BoutTracker,
    primary_right: BoutTracker,
    missed_left: BoutTracker,
    missed_right: BoutTracker,
    rows: u64,
    invalid_rows: u64,
}

impl TrialAggregator {
    /// Start a trial. `trial` is the 1-based trial number.
    pub fn new(trial: usize, criteria: InteractionCriteria) -> Self {
        let run = criteria.required_run_length;
        Self {
            trial,
            criteria,
            primary_left: BoutTracker::new(criteria.left_zone, run),
            primary_right: BoutTracker::new(criteria.right_zone, run),
            missed_left: BoutTracker::new(criteria.left_zone, run),
            missed_right: BoutTracker::new(criteria.right_zone, run),
            rows: 0,
            invalid_rows: 0,
        }
    }

    /// Process the next frame. Rows must arrive in recorded order.
    pub fn process_row(&mut self, row: &FrameRow) {
        self.rows += 1;
        if row.has_invalid_point() {
            self.invalid_rows += 1;
        }

        self.primary_left.process(row.subject_a);
        self.primary_right.process(row.subject_b);
        self.missed_left.process(row.subject_b);
        self.missed_right.process(row.subject_a);
    }

    /// Reconcile both sides and build the per-subject summaries.
    pub fn finish(self) -> TrialOutcome {
        let left = SideCounts {
            primary: self.primary_left.finish(),
            missed: self.missed_left.finish(),
        };
        let right = SideCounts {
            primary: self.primary_right.finish(),
            missed: self.missed_right.finish(),
        };

        let left_summary =
            TrialSummary::from_reconciled(self.trial, Side::Left, &reconcile(&left), &self.criteria);
        let right_summary = TrialSummary::from_reconciled(
            self.trial,
            Side::Right,
            &reconcile(&right),
            &self.criteria,
        );

        tracing::debug!(
            trial = self.trial,
            rows = self.rows,
            left_bouts = left_summary.bout_count,
            right_bouts = right_summary.bout_count,
            "Trial aggregated"
        );

        TrialOutcome {
            trial: self.trial,
            left,
            right,
            summaries: [left_summary, right_summary],
            invalid_rows: self.invalid_rows,
            rows: self.rows,
        }
    }
}

/// Run a whole trial from an ordered row sequence.
pub fn aggregate_trial<I>(trial: usize, criteria: &InteractionCriteria, rows: I) -> TrialOutcome
where
    I: IntoIterator<Item = FrameRow>,
{
    let mut aggregator = TrialAggregator::new(trial, *criteria);
    for row in rows {
        aggregator.process_row(&row);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{InteractionZone, Point};

    fn criteria() -> InteractionCriteria {
        InteractionCriteria {
            left_zone: InteractionZone::new(100.0, 100.0, 10.0),
            right_zone: InteractionZone::new(300.0, 100.0, 10.0),
            required_run_length: 3,
            fps: 30.0,
            trial_runtime_secs: 60.0,
            pixels_per_cm: 1.0,
            distance_in_pixels: 0.0,
        }
    }

    const AWAY: Point = Point { x: 200.0, y: 400.0 };
    const LEFT: Point = Point { x: 101.0, y: 99.0 };
    const RIGHT: Point = Point { x: 299.0, y: 101.0 };

    fn state(total_frames: u64, total_qualifying_frames: u64, bout_count: u64) -> BoutState {
        BoutState {
            total_frames,
            total_qualifying_frames,
            current_run_length: 0,
            bout_count,
        }
    }

    #[test]
    fn test_reconcile_prefers_missed_when_higher() {
        let counts = SideCounts {
            primary: state(100, 12, 1),
            missed: state(90, 8, 2),
        };
        let r = reconcile(&counts);
        assert_eq!(r.bout_count, 2);
        assert_eq!(r.total_qualifying_frames, 8);
        assert_eq!(r.total_frames, 100);
        assert_eq!(r.source, CountSource::Missed);
    }

    #[test]
    fn test_reconcile_tie_goes_to_missed() {
        let counts = SideCounts {
            primary: state(100, 20, 2),
            missed: state(100, 6, 2),
        };
        let r = reconcile(&counts);
        assert_eq!(r.source, CountSource::Missed);
        assert_eq!(r.total_qualifying_frames, 6);
    }

    #[test]
    fn test_reconcile_keeps_primary_when_higher() {
        let counts = SideCounts {
            primary: state(100, 20, 3),
            missed: state(100, 30, 2),
        };
        let r = reconcile(&counts);
        assert_eq!(r.source, CountSource::Primary);
        assert_eq!(r.bout_count, 3);
        assert_eq!(r.total_qualifying_frames, 20);
    }

    #[test]
    fn test_single_bout_summary() {
        let mut rows = vec![FrameRow::new(AWAY, AWAY); 13];
        for row in rows.iter_mut().take(6).skip(3) {
            row.subject_a = LEFT;
        }

        let outcome = aggregate_trial(1, &criteria(), rows);
        let subject1 = &outcome.summaries[0];

        assert_eq!(subject1.key(), "trial_1_subject_1");
        assert_eq!(subject1.bout_count, 1);
        assert_eq!(subject1.total_qualifying_frames, 3);
        assert_eq!(subject1.total_frames, 13);
        assert_eq!(subject1.source, CountSource::Primary);
        assert!((subject1.qualifying_secs - 0.1).abs() < 1e-9);
        assert!((subject1.percent_qualifying_frames - 3.0 / 13.0 * 100.0).abs() < 1e-9);
        assert!((subject1.percent_qualifying_time - 0.1 / 60.0 * 100.0).abs() < 1e-9);

        let subject2 = &outcome.summaries[1];
        assert_eq!(subject2.key(), "trial_1_subject_2");
        assert_eq!(subject2.bout_count, 0);
        // Both pairings found nothing; the tie resolves to the missed pairing.
        assert_eq!(subject2.source, CountSource::Missed);
    }

    #[test]
    fn test_swapped_identities_recovered_from_missed_pairing() {
        // Subject B sits at the left object, subject A at the right one.
        let mut rows = vec![FrameRow::new(AWAY, AWAY); 10];
        for row in rows.iter_mut().take(5) {
            row.subject_b = LEFT;
            row.subject_a = RIGHT;
        }
        rows[7].subject_b = Point::invalid();

        let outcome = aggregate_trial(2, &criteria(), rows);
        let [left, right] = &outcome.summaries;

        assert_eq!(left.bout_count, 1);
        assert_eq!(left.total_qualifying_frames, 5);
        assert_eq!(left.source, CountSource::Missed);
        // Frame total still comes from subject A's primary pairing.
        assert_eq!(left.total_frames, 10);

        assert_eq!(right.bout_count, 1);
        assert_eq!(right.total_frames, 9);
        assert_eq!(outcome.invalid_rows, 1);
        assert_eq!(outcome.rows, 10);
    }

    #[test]
    fn test_no_valid_frames_reports_zero_percent() {
        let rows = vec![FrameRow::new(Point::invalid(), Point::invalid()); 4];
        let outcome = aggregate_trial(1, &criteria(), rows);
        assert_eq!(outcome.summaries[0].total_frames, 0);
        assert_eq!(outcome.summaries[0].percent_qualifying_frames, 0.0);
        assert_eq!(outcome.invalid_rows, 4);
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let mut rows = vec![FrameRow::new(AWAY, AWAY); 20];
        for row in rows.iter_mut().skip(4).take(8) {
            row.subject_a = LEFT;
            row.subject_b = RIGHT;
        }
        let first = aggregate_trial(1, &criteria(), rows.clone());
        let second = aggregate_trial(1, &criteria(), rows);
        assert_eq!(first, second);
    }
}
