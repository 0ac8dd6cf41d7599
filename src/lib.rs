//! Sniff Bout - social-interaction scoring for two-object arena recordings.
//!
//! This library turns per-frame nose coordinates of two tracked subjects into
//! interaction bouts near a left and a right object. Tracking itself happens
//! upstream; the input is one comma-separated table per trial.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Sniff Bout                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐         │
//! │  │   Input     │──▶│   Trial     │──▶│   Report    │         │
//! │  │ (CSV table) │   │ Aggregator  │   │ (CSV/JSON)  │         │
//! │  └─────────────┘   └─────────────┘   └─────────────┘         │
//! │                      │  4 × BoutTracker                      │
//! │                      ▼                                       │
//! │               ┌─────────────┐        ┌─────────────┐         │
//! │               │  Geometry   │        │  Audit Log  │         │
//! │               │ (zone test) │        │ (run stats) │         │
//! │               └─────────────┘        └─────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sniff_bout::{audit, batch, config::AnalysisConfig};
//! use std::path::Path;
//!
//! let config = AnalysisConfig::load().expect("Failed to load config");
//! let criteria = config.criteria().expect("Invalid configuration");
//! let log = audit::AuditLog::new();
//!
//! let report = batch::run_batch(
//!     Path::new("trials"),
//!     &criteria,
//!     &config.columns,
//!     batch::BatchOptions::default(),
//!     &log,
//! )
//! .expect("Failed to read trial directory");
//!
//! for summary in &report.summaries {
//!     println!("{}: {} bouts", summary.key(), summary.bout_count);
//! }
//! ```

pub mod audit;
pub mod batch;
pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod report;

// Re-export key types at crate root for convenience
pub use audit::{AuditLog, AuditStats, SharedAuditLog};
pub use batch::{analyze_trial_file, run_batch, BatchOptions, BatchReport, SkippedTrial};
pub use config::{AnalysisConfig, ColumnLayout, CoordPair, ObjectPlacement, OutputFormat};
pub use crate::core::{
    aggregate_trial, is_within_zone, BoutState, BoutTracker, InteractionCriteria,
    InteractionZone, Point, TrialAggregator, TrialSummary,
};
pub use error::{AnalysisError, ConfigError, Result};
pub use input::{FrameRow, TrackingTable};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
