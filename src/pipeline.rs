//! Loading shared by every command: regions, identities, events, sources.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span};

use hmhews_events::dibi::{DibiRow, events_from_rows, hierarchy_from_rows};
use hmhews_events::{DibiHttpStore, EventStore, InMemoryEventStore};
use hmhews_index::HazardIndexEngine;
use hmhews_io::{read_dibi_export, read_hierarchy, read_overrides, read_sample_table};
use hmhews_regions::{Hierarchy, IdentityResolver, IdentityTable, OverrideTable};
use hmhews_sources::{
    ForecastPrecipitation, HazardSource, RiskIndex, SatellitePrecipitation, SourceKind,
    SourceRegistry,
};

use crate::config::HmhewsConfig;
use crate::convert::{self, EventStoreKind};

/// Hierarchy names used in logs, reports, and override templates.
pub const BOUNDARY_HIERARCHY: &str = "gadm";
pub const DISASTER_HIERARCHY: &str = "dibi";

/// Both hierarchies and the identity table linking them.
pub struct Identities {
    pub boundary: Hierarchy,
    pub disaster: Hierarchy,
    pub table: IdentityTable,
}

impl Identities {
    /// Boundary region ids at the configured evaluation level.
    pub fn evaluated_regions(&self, config: &HmhewsConfig) -> Result<Vec<String>> {
        let level = convert::parse_level(config.regions.level)?;
        Ok(self
            .boundary
            .at_level(level)
            .map(|r| r.region_id().to_string())
            .collect())
    }
}

/// Rows of the configured DIBI export; empty when none is configured.
pub fn read_export(config: &HmhewsConfig) -> Result<Vec<DibiRow>> {
    let Some(ref path) = config.events.export else {
        debug!("no DIBI export configured");
        return Ok(Vec::new());
    };
    read_dibi_export(path).with_context(|| format!("failed to read DIBI export: {}", path.display()))
}

/// Loads both hierarchies and resolves identities between them.
///
/// Without an explicit `[regions].disaster` list the disaster hierarchy is
/// derived from the event export rows.
pub fn resolve_identities(config: &HmhewsConfig, rows: &[DibiRow]) -> Result<Identities> {
    let _span = info_span!("resolve").entered();
    let regions = &config.regions;
    let boundary = read_hierarchy(&regions.boundary, BOUNDARY_HIERARCHY)
        .with_context(|| format!("failed to load boundary regions: {}", regions.boundary.display()))?;
    let disaster = match regions.disaster {
        Some(ref path) => read_hierarchy(path, DISASTER_HIERARCHY)
            .with_context(|| format!("failed to load disaster regions: {}", path.display()))?,
        None if config.events.export.is_none() => {
            bail!("[regions].disaster is required when [events] has no export")
        }
        None => hierarchy_from_rows(DISASTER_HIERARCHY, rows)
            .context("failed to derive disaster regions from the event export")?,
    };
    let overrides = match regions.overrides {
        Some(ref path) => read_overrides(path)
            .with_context(|| format!("failed to read overrides: {}", path.display()))?,
        None => OverrideTable::new(),
    };

    let table = IdentityResolver::new(overrides)
        .resolve(&boundary, &disaster)
        .context("identity resolution failed")?;
    Ok(Identities {
        boundary,
        disaster,
        table,
    })
}

/// The ground-truth store selected by `[events].store`.
///
/// The `export` store holds every row of the export; `dibi_http` queries
/// DIBI per region and year.
pub fn build_store(config: &HmhewsConfig, rows: &[DibiRow]) -> Result<Box<dyn EventStore>> {
    let events = &config.events;
    match convert::parse_event_store(&events.store)? {
        EventStoreKind::Export => {
            if events.export.is_none() {
                bail!("[events].export is required by the export store");
            }
            let converted = events_from_rows(rows);
            let store = InMemoryEventStore::new(DISASTER_HIERARCHY, converted.events)
                .with_skipped_records(converted.skipped);
            info!(
                events = store.len(),
                regions = store.regions().count(),
                skipped = converted.skipped,
                "event store ready"
            );
            Ok(Box::new(store))
        }
        EventStoreKind::DibiHttp => {
            let http = convert::build_http_config(events)?;
            let store = DibiHttpStore::new(DISASTER_HIERARCHY, http)
                .context("failed to set up the DIBI client")?;
            Ok(Box::new(store))
        }
    }
}

/// Loads every `[[sources]]` table and builds the hazard index engine.
pub fn build_engine(config: &HmhewsConfig) -> Result<HazardIndexEngine> {
    let index = convert::build_index_config(&config.index, &config.sources)?;
    let mut registry = SourceRegistry::new();
    for source in &config.sources {
        let table = read_sample_table(&source.path)
            .with_context(|| format!("failed to load source '{}': {}", source.id, source.path.display()))?;
        let adapter: Arc<dyn HazardSource> = match convert::parse_kind(&source.kind)? {
            SourceKind::Forecast => Arc::new(ForecastPrecipitation::new(&source.id, table)),
            SourceKind::HistoricalSatellite => Arc::new(SatellitePrecipitation::new(&source.id, table)),
            SourceKind::RiskIndex => Arc::new(RiskIndex::new(&source.id, table)),
        };
        registry.register(adapter);
    }
    let retry = convert::build_retry_policy(&config.retry)?;
    HazardIndexEngine::new(index, &registry, retry).context("failed to build hazard index engine")
}

/// Writes a JSON report to `output`, or prints it to stdout.
pub fn emit<T: serde::Serialize>(report: &T, output: Option<&std::path::Path>) -> Result<()> {
    match output {
        Some(path) => {
            hmhews_io::write_json(path, report)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", hmhews_evaluate::to_json(report).context("failed to serialize report")?),
    }
    Ok(())
}
