//! The hazard index engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use hmhews_calendar::{DateRange, NaiveDate};
use hmhews_retry::{RetryPolicy, retry};
use hmhews_sources::{HazardSource, SourceRegistry};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{CompositionRule, IndexConfig, SourceSpec};
use crate::error::IndexError;

// ---------------------------------------------------------------------------
// HazardSample / CellOutcome
// ---------------------------------------------------------------------------

/// A normalized hazard value for one region on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardSample {
    region_id: String,
    date: NaiveDate,
    value: f64,
    source: String,
}

impl HazardSample {
    pub fn new(
        region_id: impl Into<String>,
        date: NaiveDate,
        value: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            region_id: region_id.into(),
            date,
            value,
            source: source.into(),
        }
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Hazard value in `[0, 1]`.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Identifiers of the sources that contributed, joined with `+`.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Result of computing one (region, day) cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    Sample(HazardSample),
    /// No source (or a required source) had data for the day.
    NoData,
    /// A source kept failing after the retry budget was spent.
    Failed { source: String, reason: String },
}

impl CellOutcome {
    pub fn sample(&self) -> Option<&HazardSample> {
        match self {
            Self::Sample(s) => Some(s),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.sample().map(HazardSample::value)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

// ---------------------------------------------------------------------------
// HazardIndexEngine
// ---------------------------------------------------------------------------

/// Composes hazard sources into one normalized value per cell.
///
/// Output depends only on the configuration and what the adapters return,
/// so the same region, day and adapter answers always give the same
/// [`CellOutcome`].
pub struct HazardIndexEngine {
    config: IndexConfig,
    adapters: Vec<Arc<dyn HazardSource>>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for HazardIndexEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HazardIndexEngine")
            .field("config", &self.config)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl HazardIndexEngine {
    /// Builds the engine, resolving every configured source in `registry`.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, an invalid retry policy, an unknown
    /// source identifier, or a source whose kind differs from its spec.
    pub fn new(
        config: IndexConfig,
        registry: &SourceRegistry,
        retry: RetryPolicy,
    ) -> Result<Self, IndexError> {
        config.validate()?;
        retry.validate().map_err(|e| IndexError::InvalidConfig {
            reason: e.to_string(),
        })?;

        let ids: Vec<&str> = config.sources().iter().map(SourceSpec::identifier).collect();
        let adapters = registry.resolve(&ids)?;
        for (spec, adapter) in config.sources().iter().zip(&adapters) {
            if adapter.kind() != spec.kind() {
                return Err(IndexError::InvalidConfig {
                    reason: format!(
                        "source '{}' is configured as {} but the adapter provides {}",
                        spec.identifier(),
                        spec.kind(),
                        adapter.kind()
                    ),
                });
            }
        }
        debug!(index = config.identifier(), sources = ?ids, rule = ?config.rule(), "hazard index engine ready");

        Ok(Self {
            config,
            adapters,
            retry,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Computes one cell.
    pub fn compute(&self, region_id: &str, date: NaiveDate) -> CellOutcome {
        self.compute_window(region_id, &DateRange::single(date))
            .pop()
            .map_or(CellOutcome::NoData, |(_, outcome)| outcome)
    }

    /// Computes every day of `window` for one region, fetching each source
    /// once. A source that fails after retries fails every cell of the
    /// window.
    pub fn compute_window(&self, region_id: &str, window: &DateRange) -> Vec<(NaiveDate, CellOutcome)> {
        let mut per_source: Vec<BTreeMap<NaiveDate, Vec<f64>>> = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            let label = format!("fetch {} for {region_id}", adapter.identifier());
            match retry(&self.retry, &label, || adapter.fetch(region_id, window)) {
                Ok(samples) => {
                    let mut days: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
                    for s in samples {
                        days.entry(s.date()).or_default().push(s.value());
                    }
                    per_source.push(days);
                }
                Err(e) => {
                    warn!(region = region_id, source = adapter.identifier(), error = %e, "hazard source failed; cells marked failed");
                    let source = adapter.identifier().to_string();
                    let reason = e.to_string();
                    return window
                        .iter()
                        .map(|d| {
                            (
                                d,
                                CellOutcome::Failed {
                                    source: source.clone(),
                                    reason: reason.clone(),
                                },
                            )
                        })
                        .collect();
                }
            }
        }

        window
            .iter()
            .map(|d| (d, self.compose(region_id, d, &per_source)))
            .collect()
    }

    fn compose(
        &self,
        region_id: &str,
        date: NaiveDate,
        per_source: &[BTreeMap<NaiveDate, Vec<f64>>],
    ) -> CellOutcome {
        let specs = self.config.sources();
        let components: Vec<Option<f64>> = specs
            .iter()
            .zip(per_source)
            .map(|(spec, days)| {
                days.get(&date)
                    .and_then(|v| spec.aggregation().apply(v))
                    .map(|raw| spec.scale().normalize(raw))
            })
            .collect();

        if specs
            .iter()
            .zip(&components)
            .any(|(spec, c)| spec.required() && c.is_none())
        {
            return CellOutcome::NoData;
        }

        let present: Vec<(&SourceSpec, f64)> = specs
            .iter()
            .zip(&components)
            .filter_map(|(spec, c)| c.map(|v| (spec, v)))
            .collect();

        let (value, used): (f64, Vec<&str>) = match (self.config.rule(), present.as_slice()) {
            (_, []) => return CellOutcome::NoData,
            // a lone component passes through unchanged
            (CompositionRule::Precedence, [(spec, v), ..])
            | (CompositionRule::WeightedMean, [(spec, v)]) => (*v, vec![spec.identifier()]),
            (CompositionRule::WeightedMean, _) => {
                let num: f64 = present.iter().map(|(s, v)| s.weight() * v).sum();
                let den: f64 = present.iter().map(|(s, _)| s.weight()).sum();
                (num / den, present.iter().map(|(s, _)| s.identifier()).collect())
            }
        };

        CellOutcome::Sample(HazardSample::new(
            region_id,
            date,
            value.clamp(0.0, 1.0),
            used.join("+"),
        ))
    }
}
