//! Core bout-detection logic.
//!
//! This module contains:
//! - Zone geometry and containment tests
//! - Per-pairing bout tracking over a frame sequence
//! - Per-trial aggregation and reconciliation of the four pairings

pub mod bout;
pub mod criteria;
pub mod geometry;
pub mod trial;

// Re-export commonly used types
pub use bout::{process_frame, BoutState, BoutTracker};
pub use criteria::{required_run_length, InteractionCriteria};
pub use geometry::{is_within_zone, InteractionZone, Point};
pub use trial::{
    aggregate_trial, reconcile, CountSource, Reconciled, Side, SideCounts, TrialAggregator,
    TrialOutcome, TrialSummary,
};
