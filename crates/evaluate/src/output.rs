//! JSON output structures for backtest results.

use serde::Serialize;

use hmhews_calendar::NaiveDate;
use hmhews_index::CompositionRule;

use crate::confusion::{ConfusionMatrix, Metrics};
use crate::error::EvaluateError;

/// Summary of the configuration used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: usize,
    pub hazard_threshold: f64,
    pub threshold_scale: f64,
    pub normalized_threshold: f64,
    pub hazard_index: String,
    pub hazard_sources: Vec<String>,
    pub composition: CompositionRule,
    pub event_types: Vec<String>,
    pub min_affected: Option<u64>,
    pub parallel: bool,
}

/// Cells and regions kept out of the confusion matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Exclusions {
    /// Boundary regions without a disaster-database link.
    pub unresolved_regions: usize,
    /// `unresolved_regions × days`.
    pub unresolved_region_days: u64,
    /// Resolved cells without a hazard value, failed cells included.
    pub no_data_cells: u64,
    /// Subset of `no_data_cells` caused by an adapter or the ground-truth
    /// query failing after retries.
    pub failed_cells: u64,
    /// Resolved regions whose ground-truth query failed after retries.
    pub failed_regions: usize,
}

impl Exclusions {
    pub fn merge(self, other: Self) -> Self {
        Self {
            unresolved_regions: self.unresolved_regions + other.unresolved_regions,
            unresolved_region_days: self.unresolved_region_days + other.unresolved_region_days,
            no_data_cells: self.no_data_cells + other.no_data_cells,
            failed_cells: self.failed_cells + other.failed_cells,
            failed_regions: self.failed_regions + other.failed_regions,
        }
    }
}

/// Top-level backtest output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub config: ConfigSummary,
    #[serde(flatten)]
    pub confusion: ConfusionMatrix,
    #[serde(flatten)]
    pub metrics: Metrics,
    /// Cells in the confusion matrix.
    pub evaluated_cells: u64,
    /// Resolved regions that took part.
    pub evaluated_regions: usize,
    #[serde(flatten)]
    pub exclusions: Exclusions,
    /// Ground-truth records the store dropped as malformed.
    pub skipped_event_records: u64,
    /// Ids of the unresolved regions, ordered.
    pub unresolved_region_ids: Vec<String>,
}

/// One threshold's result in a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub hazard_threshold: f64,
    pub normalized_threshold: f64,
    #[serde(flatten)]
    pub confusion: ConfusionMatrix,
    #[serde(flatten)]
    pub metrics: Metrics,
}

/// Results of scoring several thresholds over the same cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub config: ConfigSummary,
    /// One row per threshold, ascending.
    pub rows: Vec<SweepRow>,
    /// Index into `rows` of the highest F1; ties go to the lowest threshold.
    pub best: usize,
    pub evaluated_regions: usize,
    #[serde(flatten)]
    pub exclusions: Exclusions,
    pub skipped_event_records: u64,
}

impl SweepReport {
    pub fn best_row(&self) -> Option<&SweepRow> {
        self.rows.get(self.best)
    }
}

/// Serialize any report to a pretty JSON string.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, EvaluateError> {
    serde_json::to_string_pretty(report).map_err(|e| EvaluateError::Serialization {
        reason: e.to_string(),
    })
}
