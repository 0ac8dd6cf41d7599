//! Self-describing JSON report of a batch.

use crate::audit::AuditStats;
use crate::batch::{BatchReport, SkippedTrial};
use crate::core::criteria::InteractionCriteria;
use crate::core::trial::TrialSummary;
use crate::report::cohort::CohortStats;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use uuid::Uuid;

/// The report format version.
pub const REPORT_VERSION: &str = "1.0";

/// The name of this producer.
pub const PRODUCER_NAME: &str = "sniff-bout";

/// Producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    /// Unique run identifier (UUID)
    pub run_id: String,
}

/// Full analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_version: String,
    /// When the report was computed (RFC3339)
    pub computed_at_utc: String,
    pub producer: Producer,
    /// Criteria every trial was scored against
    pub criteria: InteractionCriteria,
    pub summaries: Vec<TrialSummary>,
    pub skipped: Vec<SkippedTrial>,
    pub cohort: CohortStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditStats>,
}

impl AnalysisReport {
    /// Assemble a report for a finished batch.
    pub fn build(
        batch: &BatchReport,
        criteria: &InteractionCriteria,
        audit: Option<AuditStats>,
    ) -> Self {
        Self {
            report_version: REPORT_VERSION.to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: crate::VERSION.to_string(),
                run_id: Uuid::new_v4().to_string(),
            },
            criteria: *criteria,
            summaries: batch.summaries.clone(),
            skipped: batch.skipped.clone(),
            cohort: CohortStats::compute(&batch.summaries),
            audit,
        }
    }
}

/// Write the report as pretty JSON.
pub fn write_json<W: Write>(writer: &mut W, report: &AnalysisReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report).map_err(io::Error::other)?;
    writeln!(writer)?;
    writer.flush()
}

/// Write one summary per line.
pub fn write_jsonl<W: Write>(writer: &mut W, summaries: &[TrialSummary]) -> io::Result<()> {
    for summary in summaries {
        let line = serde_json::to_string(summary).map_err(io::Error::other)?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
