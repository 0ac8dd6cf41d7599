//! Discovery and parsing of per-trial tracking tables.

pub mod table;

pub use table::{parse_cell, FrameRow, TrackingTable};

use crate::error::{AnalysisError, Result};
use std::path::{Path, PathBuf};

/// Extension of tracking exports, compared case-insensitively.
pub const TRIAL_EXTENSION: &str = "csv";

/// List the trial tables directly inside `dir`, sorted by file name.
///
/// Trial numbers follow this order, so the result is stable across runs.
pub fn discover_trial_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(TRIAL_EXTENSION))
                .unwrap_or(false)
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
