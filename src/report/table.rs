//! Comma-separated summary table, one row per trial subject.

use crate::core::trial::TrialSummary;
use std::io::{self, Write};

/// Column titles after the unnamed key column.
pub const COLUMNS: [&str; 5] = [
    "Total Bouts",
    "Total Qualifying Frames",
    "Total Qualifying Time (seconds)",
    "Percentage of Qualifying Frames",
    "Percentage of Qualifying Time",
];

/// Write the header and one row per summary.
pub fn write_table<W: Write>(writer: &mut W, summaries: &[TrialSummary]) -> io::Result<()> {
    writeln!(writer, ",{}", COLUMNS.join(","))?;
    for summary in summaries {
        writeln!(writer, "{}", format_row(summary))?;
    }
    writer.flush()
}

/// Render a single row. Floats keep a decimal point, so `2.0` stays `2.0`.
pub fn format_row(summary: &TrialSummary) -> String {
    format!(
        "{},{},{},{:?},{:?},{:?}",
        summary.key(),
        summary.bout_count,
        summary.total_qualifying_frames,
        summary.qualifying_secs,
        summary.percent_qualifying_frames,
        summary.percent_qualifying_time
    )
}
