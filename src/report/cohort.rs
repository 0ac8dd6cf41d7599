//! Descriptive statistics across the trials of a batch.

use crate::core::trial::TrialSummary;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Mean and spread of one measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureStats {
    pub mean: f64,
    /// Sample standard deviation; `None` below two samples
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl MeasureStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let std_dev = if values.len() < 2 {
            None
        } else {
            Some(values.iter().std_dev())
        };

        Some(Self {
            mean: values.iter().mean(),
            std_dev,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        })
    }
}

/// Statistics for one group of subject summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Subject number, or `None` for all subjects together
    pub subject: Option<usize>,
    pub samples: usize,
    pub bouts: MeasureStats,
    pub qualifying_secs: MeasureStats,
    pub percent_qualifying_time: MeasureStats,
}

impl GroupStats {
    fn from_summaries<'a, I>(subject: Option<usize>, summaries: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TrialSummary>,
    {
        let selected: Vec<&TrialSummary> = summaries.into_iter().collect();

        let bouts: Vec<f64> = selected.iter().map(|s| s.bout_count as f64).collect();
        let secs: Vec<f64> = selected.iter().map(|s| s.qualifying_secs).collect();
        let percent: Vec<f64> = selected
            .iter()
            .map(|s| s.percent_qualifying_time)
            .collect();

        Some(Self {
            subject,
            samples: selected.len(),
            bouts: MeasureStats::from_values(&bouts)?,
            qualifying_secs: MeasureStats::from_values(&secs)?,
            percent_qualifying_time: MeasureStats::from_values(&percent)?,
        })
    }
}

/// Per-subject and overall statistics for a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortStats {
    pub groups: Vec<GroupStats>,
}

impl CohortStats {
    /// Compute statistics for subject 1, subject 2 and everyone.
    pub fn compute(summaries: &[TrialSummary]) -> Self {
        let groups = [1, 2]
            .into_iter()
            .filter_map(|subject| {
                GroupStats::from_summaries(
                    Some(subject),
                    summaries.iter().filter(|s| s.subject == subject),
                )
            })
            .chain(GroupStats::from_summaries(None, summaries))
            .collect();

        Self { groups }
    }

    /// Text block for terminal output.
    pub fn render(&self) -> String {
        let mut out = String::from("Cohort Statistics:\n");
        for group in &self.groups {
            let label = match group.subject {
                Some(n) => format!("Subject {n}"),
                None => "All subjects".to_string(),
            };
            let spread = |m: &MeasureStats| match m.std_dev {
                Some(sd) => format!("{:.3} ± {:.3}", m.mean, sd),
                None => format!("{:.3}", m.mean),
            };
            out.push_str(&format!(
                "  {label} (n={}): bouts {}, qualifying time {} s\n",
                group.samples,
                spread(&group.bouts),
                spread(&group.qualifying_secs)
            ));
        }
        out
    }
}
