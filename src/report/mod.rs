//! Output of batch results: summary table, JSON report and cohort statistics.

pub mod cohort;
pub mod json;
pub mod table;

pub use cohort::{CohortStats, GroupStats, MeasureStats};
pub use json::{write_json, write_jsonl, AnalysisReport, PRODUCER_NAME, REPORT_VERSION};
pub use table::{write_table, COLUMNS};
