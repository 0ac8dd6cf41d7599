//! Batch analysis of a directory of trial tables.
//!
//! Each file is one trial. Trials share nothing but the read-only criteria,
//! so they can be folded on worker threads; results are sent back over a
//! channel and merged by a single collector keyed by trial and subject.

use crate::audit::AuditLog;
use crate::config::ColumnLayout;
use crate::core::criteria::InteractionCriteria;
use crate::core::trial::{aggregate_trial, TrialOutcome, TrialSummary};
use crate::error::{AnalysisError, Result};
use crate::input::{discover_trial_files, TrackingTable};
use crossbeam_channel::{bounded, unbounded};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Execution options for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Worker threads; 1 processes trials in order on the calling thread
    pub jobs: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// A trial left out of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTrial {
    pub trial: usize,
    pub path: PathBuf,
    pub reason: String,
}

/// Merged results of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Summaries ordered by trial then subject
    pub summaries: Vec<TrialSummary>,
    /// Trials whose file could not be used, ordered by trial
    pub skipped: Vec<SkippedTrial>,
    /// Number of trial files found
    pub files_discovered: usize,
}

impl BatchReport {
    /// True when no trial produced a summary.
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Read one trial file and fold it through the aggregator.
pub fn analyze_trial_file(
    trial: usize,
    path: &Path,
    criteria: &InteractionCriteria,
    layout: &ColumnLayout,
) -> Result<TrialOutcome> {
    let table = TrackingTable::read(path, layout)?;

    if !table.header.is_empty() && table.header.len() <= layout.max_column() {
        return Err(AnalysisError::MalformedTable {
            path: path.to_path_buf(),
            reason: format!(
                "header has {} field(s) but the column layout reads field {}",
                table.header.len(),
                layout.max_column()
            ),
        });
    }

    if table.frame_count(layout) == 0 {
        return Err(AnalysisError::MalformedTable {
            path: path.to_path_buf(),
            reason: format!(
                "no frame rows after {} header line(s) and {} metadata row(s)",
                layout.header_lines, layout.skip_rows
            ),
        });
    }

    Ok(aggregate_trial(trial, criteria, table.frame_rows(layout)))
}

/// Discover the trial files in `dir` and analyze them.
///
/// An empty directory yields an empty report. Only a directory that cannot be
/// listed is an error; unusable files are reported in [`BatchReport::skipped`].
pub fn run_batch(
    dir: &Path,
    criteria: &InteractionCriteria,
    layout: &ColumnLayout,
    options: BatchOptions,
    log: &AuditLog,
) -> Result<BatchReport> {
    let files = discover_trial_files(dir)?;
    log.record_files_discovered(files.len() as u64);

    if files.is_empty() {
        tracing::warn!(dir = %dir.display(), "No trial files found");
        return Ok(BatchReport::default());
    }

    tracing::info!(
        dir = %dir.display(),
        files = files.len(),
        jobs = options.jobs,
        required_run_length = criteria.required_run_length,
        "Starting batch"
    );

    Ok(run_files(&files, criteria, layout, options, log))
}

/// Analyze an explicit list of files. Trial numbers follow list order.
pub fn run_files(
    files: &[PathBuf],
    criteria: &InteractionCriteria,
    layout: &ColumnLayout,
    options: BatchOptions,
    log: &AuditLog,
) -> BatchReport {
    let mut collector = Collector::default();
    let jobs = options.jobs.max(1).min(files.len().max(1));

    if jobs == 1 {
        for (index, path) in files.iter().enumerate() {
            let trial = index + 1;
            let result = analyze_trial_file(trial, path, criteria, layout);
            collector.accept(trial, path, result, log);
        }
    } else {
        let (work_tx, work_rx) = bounded::<(usize, &PathBuf)>(jobs * 2);
        let (result_tx, result_rx) = unbounded();

        std::thread::scope(|scope| {
            for _ in 0..jobs {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (trial, path) in work_rx.iter() {
                        let result = analyze_trial_file(trial, path, criteria, layout);
                        if result_tx.send((trial, path, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(work_rx);
            drop(result_tx);

            scope.spawn(move || {
                for (index, path) in files.iter().enumerate() {
                    if work_tx.send((index + 1, path)).is_err() {
                        break;
                    }
                }
            });

            for (trial, path, result) in result_rx.iter() {
                collector.accept(trial, path, result, log);
            }
        });
    }

    collector.into_report(files.len())
}

/// Single writer merging trial results.
#[derive(Default)]
struct Collector {
    summaries: BTreeMap<(usize, usize), TrialSummary>,
    skipped: BTreeMap<usize, SkippedTrial>,
}

impl Collector {
    fn accept(
        &mut self,
        trial: usize,
        path: &Path,
        result: Result<TrialOutcome>,
        log: &AuditLog,
    ) {
        match result {
            Ok(outcome) => {
                log.record_trial_analyzed(outcome.rows, outcome.invalid_rows);
                for summary in outcome.summaries {
                    self.summaries
                        .insert((summary.trial, summary.subject), summary);
                }
            }
            Err(e) => {
                tracing::warn!(trial, path = %path.display(), error = %e, "Skipping trial");
                log.record_trial_skipped();
                self.skipped.insert(
                    trial,
                    SkippedTrial {
                        trial,
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    fn into_report(self, files_discovered: usize) -> BatchReport {
        BatchReport {
            summaries: self.summaries.into_values().collect(),
            skipped: self.skipped.into_values().collect(),
            files_discovered,
        }
    }
}
