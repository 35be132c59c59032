//! Pure conversion functions: TOML config structs -> crate API config types.

use std::time::Duration;

use anyhow::{Context, Result, bail};

use hmhews_calendar::{DateRange, parse_date};
use hmhews_evaluate::{BacktestConfig, RegionFilter};
use hmhews_events::{DibiHttpConfig, EventFilter, EventType};
use hmhews_index::{Aggregation, CompositionRule, IndexConfig, Scale, SourceSpec, Threshold};
use hmhews_regions::AdminLevel;
use hmhews_retry::RetryPolicy;
use hmhews_sources::SourceKind;

use crate::config::*;

/// Parses a source kind name into the corresponding enum variant.
pub fn parse_kind(s: &str) -> Result<SourceKind> {
    match s.to_lowercase().as_str() {
        "forecast" => Ok(SourceKind::Forecast),
        "historical_satellite" | "satellite" => Ok(SourceKind::HistoricalSatellite),
        "risk_index" | "risk" => Ok(SourceKind::RiskIndex),
        other => bail!("unknown source kind: {other:?}"),
    }
}

/// Parses an aggregation name into the corresponding enum variant.
pub fn parse_aggregation(s: &str) -> Result<Aggregation> {
    match s.to_lowercase().as_str() {
        "sum" => Ok(Aggregation::Sum),
        "max" => Ok(Aggregation::Max),
        "mean" => Ok(Aggregation::Mean),
        other => bail!("unknown aggregation: {other:?}"),
    }
}

/// Parses a composition rule name into the corresponding enum variant.
pub fn parse_composition(s: &str) -> Result<CompositionRule> {
    match s.to_lowercase().as_str() {
        "weighted_mean" => Ok(CompositionRule::WeightedMean),
        "precedence" => Ok(CompositionRule::Precedence),
        other => bail!("unknown composition rule: {other:?}"),
    }
}

/// Builds a [`RetryPolicy`] from the TOML retry table.
pub fn build_retry_policy(retry: &RetryToml) -> Result<RetryPolicy> {
    let policy = RetryPolicy::new(retry.max_attempts)
        .with_initial_backoff(Duration::from_millis(retry.initial_backoff_ms))
        .with_multiplier(retry.multiplier)
        .with_max_backoff(Duration::from_millis(retry.max_backoff_ms));
    policy.validate().context("invalid [retry] table")?;
    Ok(policy)
}

/// Builds a [`SourceSpec`] from one `[[sources]]` entry.
///
/// Unset weight, scale bounds, and aggregation keep the per-kind defaults.
pub fn build_source_spec(source: &SourceToml) -> Result<SourceSpec> {
    let kind = parse_kind(&source.kind)?;
    let mut spec = SourceSpec::new(&source.id, kind).with_required(source.required);
    if let Some(w) = source.weight {
        spec = spec.with_weight(w);
    }
    if source.scale_min.is_some() || source.scale_max.is_some() {
        let default = spec.scale();
        let scale = Scale::new(
            source.scale_min.unwrap_or(default.min()),
            source.scale_max.unwrap_or(default.max()),
        )
        .with_context(|| format!("invalid scale for source '{}'", source.id))?;
        spec = spec.with_scale(scale);
    }
    if let Some(ref a) = source.aggregation {
        spec = spec.with_aggregation(parse_aggregation(a)?);
    }
    Ok(spec)
}

/// Builds an [`IndexConfig`] from the `[index]` table and every source.
pub fn build_index_config(index: &IndexToml, sources: &[SourceToml]) -> Result<IndexConfig> {
    let mut cfg = IndexConfig::new()
        .with_identifier(&index.identifier)
        .with_rule(parse_composition(&index.composition)?);
    for source in sources {
        cfg = cfg.with_source(build_source_spec(source)?);
    }
    cfg.validate().context("invalid hazard index configuration")?;
    Ok(cfg)
}

/// Builds the hazard threshold; `value` overrides the configured one.
pub fn build_threshold(backtest: &BacktestToml, value: Option<f64>) -> Result<Threshold> {
    let value = value.unwrap_or(backtest.hazard_threshold);
    Threshold::new(value, backtest.threshold_scale)
        .with_context(|| format!("invalid hazard threshold {value}"))
}

/// Builds an [`EventFilter`] from the `[events]` table.
pub fn build_event_filter(events: &EventsToml) -> EventFilter {
    EventFilter::default()
        .with_event_types(events.event_types.iter().map(|t| EventType::from(t.as_str())).collect())
        .with_min_affected(events.min_affected)
}

/// Where ground-truth events come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStoreKind {
    Export,
    DibiHttp,
}

/// Parses an event store name into the corresponding enum variant.
pub fn parse_event_store(s: &str) -> Result<EventStoreKind> {
    match s.to_lowercase().as_str() {
        "export" => Ok(EventStoreKind::Export),
        "dibi_http" | "http" => Ok(EventStoreKind::DibiHttp),
        other => bail!("unknown event store: {other:?}"),
    }
}

/// Builds a [`DibiHttpConfig`] from the `[events]` table.
///
/// A single configured event type is also filtered server-side.
pub fn build_http_config(events: &EventsToml) -> Result<DibiHttpConfig> {
    if events.timeout_secs == 0 {
        bail!("[events].timeout_secs must be positive");
    }
    let mut config = DibiHttpConfig::new()
        .with_timeout(Duration::from_secs(events.timeout_secs))
        .with_page_size(events.page_size);
    if let Some(ref url) = events.url {
        config = config.with_url(url);
    }
    if let [only] = events.event_types.as_slice() {
        config = config.with_disaster_type(Some(EventType::from(only.as_str())));
    }
    Ok(config)
}

/// Parses the boundary level to evaluate.
pub fn parse_level(level: u8) -> Result<AdminLevel> {
    AdminLevel::try_from(level).context("invalid [regions].level")
}

/// Builds a [`BacktestConfig`] from the TOML configuration.
pub fn build_backtest_config(config: &HmhewsConfig, threshold: Threshold) -> Result<BacktestConfig> {
    let b = &config.backtest;
    let start = parse_date(&b.start).context("invalid [backtest].start")?;
    let end = parse_date(&b.end).context("invalid [backtest].end")?;
    let range = DateRange::new(start, end).context("invalid backtest date range")?;

    let filter = if b.region_filter.is_empty() {
        RegionFilter::All
    } else {
        RegionFilter::only(&b.region_filter)
    };

    let cfg = BacktestConfig::new(range, threshold)
        .with_region_filter(filter)
        .with_event_filter(build_event_filter(&config.events))
        .with_retry(build_retry_policy(&config.retry)?)
        .with_parallel(b.parallel);
    cfg.validate().context("invalid [backtest] table")?;
    Ok(cfg)
}
