//! Counters for an analysis run.
//!
//! Workers on different threads record into the same log, so every counter
//! is atomic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for the current run.
#[derive(Debug)]
pub struct AuditLog {
    /// Number of trial files found in the input directory
    files_discovered: AtomicU64,
    /// Number of trials that produced summaries
    trials_analyzed: AtomicU64,
    /// Number of trials left out because their file could not be used
    trials_skipped: AtomicU64,
    /// Number of frame rows folded
    frames_read: AtomicU64,
    /// Number of frame rows with at least one unreadable position
    invalid_frames: AtomicU64,
    /// Run start time
    run_start: DateTime<Utc>,
}

impl AuditLog {
    /// Create a new audit log.
    pub fn new() -> Self {
        Self {
            files_discovered: AtomicU64::new(0),
            trials_analyzed: AtomicU64::new(0),
            trials_skipped: AtomicU64::new(0),
            frames_read: AtomicU64::new(0),
            invalid_frames: AtomicU64::new(0),
            run_start: Utc::now(),
        }
    }

    /// Record discovered trial files.
    pub fn record_files_discovered(&self, count: u64) {
        self.files_discovered.fetch_add(count, Ordering::Relaxed);
    }

    /// Record an analyzed trial and its frame counts.
    pub fn record_trial_analyzed(&self, frames: u64, invalid_frames: u64) {
        self.trials_analyzed.fetch_add(1, Ordering::Relaxed);
        self.frames_read.fetch_add(frames, Ordering::Relaxed);
        self.invalid_frames
            .fetch_add(invalid_frames, Ordering::Relaxed);
    }

    /// Record a skipped trial.
    pub fn record_trial_skipped(&self) {
        self.trials_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> AuditStats {
        AuditStats {
            files_discovered: self.files_discovered.load(Ordering::Relaxed),
            trials_analyzed: self.trials_analyzed.load(Ordering::Relaxed),
            trials_skipped: self.trials_skipped.load(Ordering::Relaxed),
            frames_read: self.frames_read.load(Ordering::Relaxed),
            invalid_frames: self.invalid_frames.load(Ordering::Relaxed),
            run_start: self.run_start,
            run_duration_ms: (Utc::now() - self.run_start).num_milliseconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Run Statistics:\n\
             - Trial files discovered: {}\n\
             - Trials analyzed: {}\n\
             - Trials skipped: {}\n\
             - Frames read: {}\n\
             - Frames with unreadable positions: {}\n\
             - Run duration: {} ms",
            stats.files_discovered,
            stats.trials_analyzed,
            stats.trials_skipped,
            stats.frames_read,
            stats.invalid_frames,
            stats.run_duration_ms
        )
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of audit statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub files_discovered: u64,
    pub trials_analyzed: u64,
    pub trials_skipped: u64,
    pub frames_read: u64,
    pub invalid_frames: u64,
    pub run_start: DateTime<Utc>,
    pub run_duration_ms: u64,
}

/// Thread-safe shared audit log.
pub type SharedAuditLog = Arc<AuditLog>;

/// Create a new shared audit log.
pub fn create_shared_log() -> SharedAuditLog {
    Arc::new(AuditLog::new())
}
