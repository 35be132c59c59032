use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level hmhews configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HmhewsConfig {
    pub backtest: BacktestToml,
    pub regions: RegionsToml,
    pub events: EventsToml,
    /// Hazard sources in precedence order.
    pub sources: Vec<SourceToml>,
    #[serde(default)]
    pub index: IndexToml,
    #[serde(default)]
    pub retry: RetryToml,
}

impl HmhewsConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacktestToml {
    /// First day, `YYYY-MM-DD`, inclusive.
    pub start: String,
    /// Last day, `YYYY-MM-DD`, inclusive.
    pub end: String,
    #[serde(default = "default_hazard_threshold")]
    pub hazard_threshold: f64,
    #[serde(default = "default_threshold_scale")]
    pub threshold_scale: f64,
    /// Boundary region ids to evaluate; empty means all.
    #[serde(default)]
    pub region_filter: Vec<String>,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_hazard_threshold() -> f64 {
    0.7
}
fn default_threshold_scale() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionsToml {
    /// JSON region list of the boundary dataset.
    pub boundary: PathBuf,
    /// JSON region list of the disaster database; derived from the event
    /// export when absent.
    #[serde(default)]
    pub disaster: Option<PathBuf>,
    /// TOML manual override table.
    #[serde(default)]
    pub overrides: Option<PathBuf>,
    /// Boundary level evaluated, 0 (country) to 3 (subdistrict).
    #[serde(default = "default_level")]
    pub level: u8,
}

fn default_level() -> u8 {
    2
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsToml {
    /// `export` (read the DIBI JSON export) or `dibi_http` (query DIBI live).
    #[serde(default = "default_event_store")]
    pub store: String,
    /// DIBI JSON export. Required by the `export` store, and by either
    /// store when `[regions].disaster` is unset.
    #[serde(default)]
    pub export: Option<PathBuf>,
    /// `get_dibi3x` endpoint for the `dibi_http` store.
    #[serde(default)]
    pub url: Option<String>,
    /// Per-request timeout for the `dibi_http` store.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Rows per page for the `dibi_http` store.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Accepted type codes or names; empty accepts every type.
    #[serde(default = "default_event_types")]
    pub event_types: Vec<String>,
    #[serde(default)]
    pub min_affected: Option<u64>,
}

fn default_event_store() -> String {
    "export".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_page_size() -> usize {
    1000
}
fn default_event_types() -> Vec<String> {
    vec!["flood".to_string()]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceToml {
    pub id: String,
    /// `forecast`, `historical_satellite`, or `risk_index`.
    pub kind: String,
    /// Parquet sample table.
    pub path: PathBuf,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub scale_min: Option<f64>,
    #[serde(default)]
    pub scale_max: Option<f64>,
    /// `sum`, `max`, or `mean`; defaults per kind.
    #[serde(default)]
    pub aggregation: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexToml {
    #[serde(default = "default_index_id")]
    pub identifier: String,
    /// `weighted_mean` or `precedence`.
    #[serde(default = "default_composition")]
    pub composition: String,
}

impl Default for IndexToml {
    fn default() -> Self {
        Self {
            identifier: default_index_id(),
            composition: default_composition(),
        }
    }
}

fn default_index_id() -> String {
    "flood-hazard-index".to_string()
}
fn default_composition() -> String {
    "weighted_mean".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryToml {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryToml {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            multiplier: default_multiplier(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_initial_backoff_ms() -> u64 {
    500
}
fn default_multiplier() -> f64 {
    2.0
}
fn default_max_backoff_ms() -> u64 {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [backtest]
        start = "2022-12-01"
        end = "2022-12-31"

        [regions]
        boundary = "gadm.json"

        [events]
        export = "dibi.json"

        [[sources]]
        id = "chirps"
        kind = "historical_satellite"
        path = "chirps.parquet"
    "#;

    #[test]
    fn minimal_config_takes_defaults() {
        let c: HmhewsConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(c.backtest.hazard_threshold, 0.7);
        assert_eq!(c.backtest.threshold_scale, 1.0);
        assert!(c.backtest.parallel);
        assert!(c.backtest.region_filter.is_empty());
        assert_eq!(c.regions.level, 2);
        assert_eq!(c.events.event_types, ["flood"]);
        assert_eq!(c.events.store, "export");
        assert_eq!(c.events.timeout_secs, 30);
        assert!(c.events.url.is_none());
        assert_eq!(c.sources.len(), 1);
        assert_eq!(c.index.composition, "weighted_mean");
        assert_eq!(c.retry.max_attempts, 3);
    }

    #[test]
    fn live_store_needs_no_export() {
        let text = MINIMAL.replace(
            "export = \"dibi.json\"",
            "store = \"dibi_http\"\ntimeout_secs = 5",
        );
        let c: HmhewsConfig = toml::from_str(&text).unwrap();
        assert_eq!(c.events.store, "dibi_http");
        assert_eq!(c.events.timeout_secs, 5);
        assert!(c.events.export.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let text = MINIMAL.replace("[regions]", "[regions]\nboundry = \"typo.json\"");
        assert!(toml::from_str::<HmhewsConfig>(&text).is_err());
    }
}
