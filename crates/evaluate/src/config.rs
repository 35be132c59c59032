//! Backtest configuration.

use std::collections::BTreeSet;

use hmhews_calendar::DateRange;
use hmhews_events::EventFilter;
use hmhews_index::Threshold;
use hmhews_retry::RetryPolicy;

use crate::error::EvaluateError;

/// Which boundary regions take part in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegionFilter {
    /// Every region handed to the backtester.
    #[default]
    All,
    /// Only these boundary region ids.
    Only(BTreeSet<String>),
}

impl RegionFilter {
    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(ids.into_iter().map(Into::into).collect())
    }

    pub fn includes(&self, region_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(region_id),
        }
    }
}

/// Configuration for one backtest run.
///
/// Passed explicitly to [`Backtester::new`](crate::Backtester::new); there
/// is no process-wide state.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    range: DateRange,
    threshold: Threshold,
    region_filter: RegionFilter,
    event_filter: EventFilter,
    retry: RetryPolicy,
    parallel: bool,
}

impl BacktestConfig {
    /// Creates a configuration with all regions, the default flood event
    /// filter, the default retry policy and parallel evaluation.
    pub fn new(range: DateRange, threshold: Threshold) -> Self {
        Self {
            range,
            threshold,
            region_filter: RegionFilter::All,
            event_filter: EventFilter::default(),
            retry: RetryPolicy::default(),
            parallel: true,
        }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_region_filter(mut self, filter: RegionFilter) -> Self {
        self.region_filter = filter;
        self
    }

    pub fn with_event_filter(mut self, filter: EventFilter) -> Self {
        self.event_filter = filter;
        self
    }

    /// Sets the retry policy for ground-truth store calls.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn region_filter(&self) -> &RegionFilter {
        &self.region_filter
    }

    pub fn event_filter(&self) -> &EventFilter {
        &self.event_filter
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), EvaluateError> {
        if let RegionFilter::Only(ids) = &self.region_filter
            && ids.is_empty()
        {
            return Err(EvaluateError::InvalidConfig {
                reason: "region filter lists no regions".to_string(),
            });
        }
        self.retry
            .validate()
            .map_err(|e| EvaluateError::InvalidConfig {
                reason: e.to_string(),
            })
    }
}
