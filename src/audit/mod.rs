//! Run accounting for analysis batches.
//!
//! Tracks what a run read and what it had to leave out, so every report can
//! state how much of the input it is based on.

pub mod log;

// Re-export commonly used types
pub use log::{create_shared_log, AuditLog, AuditStats, SharedAuditLog};
