//! Comma-separated tracking tables.
//!
//! Tracking exports are plain numeric tables, so rows are split on commas
//! without quoting support. Cells that do not parse as numbers become NaN.

use crate::config::ColumnLayout;
use crate::core::geometry::Point;
use crate::error::{AnalysisError, Result};
use std::path::{Path, PathBuf};

/// One trial's table: the header line plus every following row as raw fields.
#[derive(Debug, Clone)]
pub struct TrackingTable {
    pub path: PathBuf,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TrackingTable {
    /// Read and split a table from disk.
    pub fn read(path: &Path, layout: &ColumnLayout) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        Self::parse(path, &content, layout)
    }

    /// Split already-loaded text into header and rows.
    pub fn parse(path: &Path, content: &str, layout: &ColumnLayout) -> Result<Self> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());

        let mut header = Vec::new();
        for _ in 0..layout.header_lines {
            match lines.next() {
                Some(line) => header = split_fields(line),
                None => {
                    return Err(AnalysisError::MalformedTable {
                        path: path.to_path_buf(),
                        reason: "file has no header line".to_string(),
                    })
                }
            }
        }

        let rows = lines.map(split_fields).collect();

        Ok(Self {
            path: path.to_path_buf(),
            header,
            rows,
        })
    }

    /// Rows that hold frames, in recorded order.
    pub fn frame_rows(&self, layout: &ColumnLayout) -> impl Iterator<Item = FrameRow> + '_ {
        let layout = *layout;
        self.rows
            .iter()
            .skip(layout.skip_rows)
            .map(move |fields| FrameRow::from_fields(fields.as_slice(), &layout))
    }

    /// Number of frame rows after the metadata rows.
    pub fn frame_count(&self, layout: &ColumnLayout) -> usize {
        self.rows.len().saturating_sub(layout.skip_rows)
    }
}

/// Nose positions of both subjects on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRow {
    pub subject_a: Point,
    pub subject_b: Point,
}

impl FrameRow {
    pub fn new(subject_a: Point, subject_b: Point) -> Self {
        Self {
            subject_a,
            subject_b,
        }
    }

    /// Pull both noses out of a split row. Missing fields read as NaN.
    pub fn from_fields<S: AsRef<str>>(fields: &[S], layout: &ColumnLayout) -> Self {
        let cell = |index: usize| {
            fields
                .get(index)
                .map(|f| parse_cell(f.as_ref()))
                .unwrap_or(f64::NAN)
        };

        Self {
            subject_a: Point::new(cell(layout.subject_a_x), cell(layout.subject_a_y)),
            subject_b: Point::new(cell(layout.subject_b_x), cell(layout.subject_b_y)),
        }
    }

    /// True when at least one subject position could not be read.
    pub fn has_invalid_point(&self) -> bool {
        !self.subject_a.is_valid() || !self.subject_b.is_valid()
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(|f| f.trim().to_string()).collect()
}

/// Parse a numeric cell; blanks and text become NaN.
pub fn parse_cell(raw: &str) -> f64 {
    let trimmed = raw.trim().trim_matches('"');
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
