//! The backtest evaluator.

use std::collections::BTreeSet;

use hmhews_calendar::NaiveDate;
use hmhews_events::{EventStore, positive_dates};
use hmhews_index::{CellOutcome, HazardIndexEngine, SourceSpec, Threshold};
use hmhews_regions::IdentityTable;
use hmhews_retry::retry;
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::config::BacktestConfig;
use crate::confusion::ConfusionMatrix;
use crate::error::EvaluateError;
use crate::output::{BacktestReport, ConfigSummary, Exclusions, SweepReport, SweepRow};

/// One (region, day) join unit with a hazard value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationCell {
    pub date: NaiveDate,
    pub hazard: f64,
    pub actual: bool,
}

impl EvaluationCell {
    pub fn predicted(&self, threshold: &Threshold) -> bool {
        threshold.is_exceeded_by(self.hazard)
    }
}

/// Everything fetched for one boundary region, independent of threshold.
#[derive(Debug, Clone)]
struct RegionCells {
    region_id: String,
    resolved: bool,
    cells: Vec<EvaluationCell>,
    exclusions: Exclusions,
}

impl RegionCells {
    fn tally(&self, threshold: &Threshold) -> Tally {
        let mut matrix = ConfusionMatrix::new();
        for cell in &self.cells {
            matrix.record(cell.predicted(threshold), cell.actual);
        }
        Tally {
            matrix,
            evaluated_regions: usize::from(self.resolved && self.exclusions.failed_regions == 0),
            exclusions: self.exclusions,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    matrix: ConfusionMatrix,
    evaluated_regions: usize,
    exclusions: Exclusions,
}

impl Tally {
    fn merge(self, other: Self) -> Self {
        Self {
            matrix: self.matrix.merge(other.matrix),
            evaluated_regions: self.evaluated_regions + other.evaluated_regions,
            exclusions: self.exclusions.merge(other.exclusions),
        }
    }
}

/// Joins hazard predictions against ground truth over regions × days.
pub struct Backtester<'a> {
    engine: &'a HazardIndexEngine,
    store: &'a dyn EventStore,
    identities: &'a IdentityTable,
    config: BacktestConfig,
}

impl<'a> Backtester<'a> {
    /// Creates a backtester.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluateError::InvalidConfig`] if `config` fails validation.
    pub fn new(
        engine: &'a HazardIndexEngine,
        store: &'a dyn EventStore,
        identities: &'a IdentityTable,
        config: BacktestConfig,
    ) -> Result<Self, EvaluateError> {
        config.validate()?;
        Ok(Self {
            engine,
            store,
            identities,
            config,
        })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Evaluates `boundary_regions` at the configured threshold.
    ///
    /// # Errors
    ///
    /// Fails when the region filter names a region not in
    /// `boundary_regions`, or when the ground-truth store stays unreachable
    /// after retries. A query failing for a single region does not abort
    /// the run; that region's days are counted as failed cells.
    pub fn evaluate<S: AsRef<str> + Sync>(
        &self,
        boundary_regions: &[S],
    ) -> Result<BacktestReport, EvaluateError> {
        let _span = info_span!("backtest", threshold = self.config.threshold().value()).entered();
        let regions = self.collect(boundary_regions)?;
        let threshold = self.config.threshold();
        let tally = self.reduce(&regions, &threshold);

        let report = BacktestReport {
            config: self.summary(),
            confusion: tally.matrix,
            metrics: tally.matrix.metrics(),
            evaluated_cells: tally.matrix.total(),
            evaluated_regions: tally.evaluated_regions,
            exclusions: tally.exclusions,
            skipped_event_records: self.store.skipped_records(),
            unresolved_region_ids: regions
                .iter()
                .filter(|r| !r.resolved)
                .map(|r| r.region_id.clone())
                .collect(),
        };
        info!(
            tp = report.confusion.true_positives(),
            fp = report.confusion.false_positives(),
            fn_ = report.confusion.false_negatives(),
            tn = report.confusion.true_negatives(),
            accuracy = report.metrics.accuracy,
            f1 = report.metrics.f1,
            unresolved = report.exclusions.unresolved_regions,
            no_data = report.exclusions.no_data_cells,
            failed = report.exclusions.failed_cells,
            "backtest complete"
        );
        Ok(report)
    }

    /// Scores every threshold in `thresholds` against the same cells.
    ///
    /// Cells are fetched once. Rows come back sorted by normalized
    /// threshold; the best row has the highest F1, ties going to the lowest
    /// threshold.
    pub fn sweep<S: AsRef<str> + Sync>(
        &self,
        boundary_regions: &[S],
        thresholds: &[Threshold],
    ) -> Result<SweepReport, EvaluateError> {
        if thresholds.is_empty() {
            return Err(EvaluateError::InvalidConfig {
                reason: "threshold sweep needs at least one threshold".to_string(),
            });
        }
        let _span = info_span!("sweep", thresholds = thresholds.len()).entered();
        let regions = self.collect(boundary_regions)?;

        let mut sorted = thresholds.to_vec();
        sorted.sort_by(|a, b| a.normalized().total_cmp(&b.normalized()));

        let mut rows = Vec::with_capacity(sorted.len());
        let mut shared = Tally::default();
        for threshold in &sorted {
            let tally = self.reduce(&regions, threshold);
            debug!(threshold = threshold.value(), tp = tally.matrix.true_positives(), "threshold scored");
            rows.push(SweepRow {
                hazard_threshold: threshold.value(),
                normalized_threshold: threshold.normalized(),
                confusion: tally.matrix,
                metrics: tally.matrix.metrics(),
            });
            shared = tally;
        }

        let mut best = 0;
        for (i, row) in rows.iter().enumerate() {
            if row.metrics.f1 > rows[best].metrics.f1 {
                best = i;
            }
        }
        if let Some(row) = rows.get(best) {
            info!(threshold = row.hazard_threshold, f1 = row.metrics.f1, "best threshold");
        }

        Ok(SweepReport {
            config: self.summary(),
            rows,
            best,
            evaluated_regions: shared.evaluated_regions,
            exclusions: shared.exclusions,
            skipped_event_records: self.store.skipped_records(),
        })
    }

    fn reduce(&self, regions: &[RegionCells], threshold: &Threshold) -> Tally {
        if self.config.parallel() {
            regions
                .par_iter()
                .map(|r| r.tally(threshold))
                .reduce(Tally::default, Tally::merge)
        } else {
            regions
                .iter()
                .map(|r| r.tally(threshold))
                .fold(Tally::default(), Tally::merge)
        }
    }

    fn collect<S: AsRef<str> + Sync>(
        &self,
        boundary_regions: &[S],
    ) -> Result<Vec<RegionCells>, EvaluateError> {
        let selected = self.select(boundary_regions)?;

        retry(self.config.retry(), "event store availability", || {
            self.store.check_available()
        })
        .map_err(|e| EvaluateError::UpstreamUnavailable {
            store: self.store.name().to_string(),
            reason: e.to_string(),
        })?;

        info!(
            regions = selected.len(),
            days = self.config.range().len(),
            parallel = self.config.parallel(),
            "collecting cells"
        );
        let collected: Vec<RegionCells> = if self.config.parallel() {
            selected.par_iter().map(|id| self.collect_region(id)).collect()
        } else {
            selected.iter().map(|id| self.collect_region(id)).collect()
        };

        let unresolved = collected.iter().filter(|r| !r.resolved).count();
        if unresolved > 0 {
            warn!(unresolved, "regions without a ground-truth link are excluded from the matrix");
        }
        let failed = collected.iter().filter(|r| r.exclusions.failed_regions > 0).count();
        if failed > 0 {
            warn!(failed, "regions whose ground-truth query failed are excluded from the matrix");
        }
        let skipped = self.store.skipped_records();
        if skipped > 0 {
            warn!(skipped, store = self.store.name(), "ground-truth records were dropped as malformed");
        }
        Ok(collected)
    }

    fn select<'r, S: AsRef<str>>(&self, boundary_regions: &'r [S]) -> Result<Vec<&'r str>, EvaluateError> {
        let available: BTreeSet<&str> = boundary_regions.iter().map(AsRef::as_ref).collect();
        if let crate::config::RegionFilter::Only(ids) = self.config.region_filter() {
            let missing: Vec<&str> = ids
                .iter()
                .map(String::as_str)
                .filter(|id| !available.contains(id))
                .collect();
            if !missing.is_empty() {
                return Err(EvaluateError::InvalidConfig {
                    reason: format!("region filter names unknown regions: {}", missing.join(", ")),
                });
            }
        }
        Ok(available
            .into_iter()
            .filter(|id| self.config.region_filter().includes(id))
            .collect())
    }

    fn collect_region(&self, region_id: &str) -> RegionCells {
        let range = self.config.range();
        let Some(target) = self.identities.target(region_id) else {
            debug!(region = region_id, "unresolved; skipped");
            return RegionCells {
                region_id: region_id.to_string(),
                resolved: false,
                cells: Vec::new(),
                exclusions: Exclusions {
                    unresolved_regions: 1,
                    unresolved_region_days: range.len() as u64,
                    ..Exclusions::default()
                },
            };
        };

        let label = format!("query {} for {target}", self.store.name());
        let events = match retry(self.config.retry(), &label, || self.store.query(target, range)) {
            Ok(events) => events,
            Err(e) => {
                warn!(region = region_id, target, error = %e, "ground-truth query failed; region days count as failed");
                let days = range.len() as u64;
                return RegionCells {
                    region_id: region_id.to_string(),
                    resolved: true,
                    cells: Vec::new(),
                    exclusions: Exclusions {
                        no_data_cells: days,
                        failed_cells: days,
                        failed_regions: 1,
                        ..Exclusions::default()
                    },
                };
            }
        };
        let positives = positive_dates(&events, self.config.event_filter());

        let mut cells = Vec::with_capacity(range.len());
        let mut exclusions = Exclusions::default();
        for (date, outcome) in self.engine.compute_window(region_id, range) {
            match outcome {
                CellOutcome::Sample(sample) => cells.push(EvaluationCell {
                    date,
                    hazard: sample.value(),
                    actual: positives.contains(&date),
                }),
                CellOutcome::NoData => exclusions.no_data_cells += 1,
                CellOutcome::Failed { .. } => {
                    exclusions.no_data_cells += 1;
                    exclusions.failed_cells += 1;
                }
            }
        }
        debug!(
            region = region_id,
            target,
            cells = cells.len(),
            positives = positives.len(),
            no_data = exclusions.no_data_cells,
            "region collected"
        );

        RegionCells {
            region_id: region_id.to_string(),
            resolved: true,
            cells,
            exclusions,
        }
    }

    fn summary(&self) -> ConfigSummary {
        let range = self.config.range();
        let threshold = self.config.threshold();
        let index = self.engine.config();
        let filter = self.config.event_filter();
        ConfigSummary {
            start: range.start(),
            end: range.end(),
            days: range.len(),
            hazard_threshold: threshold.value(),
            threshold_scale: threshold.scale_max(),
            normalized_threshold: threshold.normalized(),
            hazard_index: index.identifier().to_string(),
            hazard_sources: index
                .sources()
                .iter()
                .map(SourceSpec::identifier)
                .map(str::to_string)
                .collect(),
            composition: index.rule(),
            event_types: filter.event_types().iter().map(ToString::to_string).collect(),
            min_affected: filter.min_affected(),
            parallel: self.config.parallel(),
        }
    }
}
