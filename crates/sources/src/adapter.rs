//! The hazard source capability and its provider variants.

use hmhews_calendar::DateRange;
use tracing::trace;

use crate::error::SourceError;
use crate::kind::SourceKind;
use crate::sample::{RawSample, SampleTable};

/// A provider of raw hazard samples.
///
/// `fetch` returns an empty vector when the provider simply has nothing for
/// the window. Transport problems are reported as
/// [`SourceError::Unavailable`].
pub trait HazardSource: Send + Sync {
    /// Stable identifier used in configuration and reports.
    fn identifier(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Raw provider-native samples for `region_id` within `window`.
    fn fetch(&self, region_id: &str, window: &DateRange) -> Result<Vec<RawSample>, SourceError>;
}

// ---------------------------------------------------------------------------
// ForecastPrecipitation
// ---------------------------------------------------------------------------

/// Precipitation forecast steps, several per day.
#[derive(Debug, Clone)]
pub struct ForecastPrecipitation {
    identifier: String,
    table: SampleTable,
}

impl ForecastPrecipitation {
    pub fn new(identifier: impl Into<String>, table: SampleTable) -> Self {
        Self {
            identifier: identifier.into(),
            table,
        }
    }
}

impl HazardSource for ForecastPrecipitation {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Forecast
    }

    fn fetch(&self, region_id: &str, window: &DateRange) -> Result<Vec<RawSample>, SourceError> {
        let mut out = Vec::new();
        for (date, values) in self.table.days_in(region_id, window) {
            for &value in values {
                if !value.is_finite() {
                    return Err(SourceError::Provider {
                        source_id: self.identifier.clone(),
                        reason: format!("non-finite forecast step for '{region_id}' on {date}"),
                    });
                }
                out.push(RawSample::new(region_id, date, value, &self.identifier));
            }
        }
        trace!(source = %self.identifier, region = region_id, n = out.len(), "forecast fetch");
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// SatellitePrecipitation
// ---------------------------------------------------------------------------

/// Daily satellite precipitation estimates.
///
/// Negative values are the provider's no-data sentinel and are dropped, so a
/// day holding only sentinels yields no sample.
#[derive(Debug, Clone)]
pub struct SatellitePrecipitation {
    identifier: String,
    table: SampleTable,
}

impl SatellitePrecipitation {
    pub fn new(identifier: impl Into<String>, table: SampleTable) -> Self {
        Self {
            identifier: identifier.into(),
            table,
        }
    }
}

impl HazardSource for SatellitePrecipitation {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn kind(&self) -> SourceKind {
        SourceKind::HistoricalSatellite
    }

    fn fetch(&self, region_id: &str, window: &DateRange) -> Result<Vec<RawSample>, SourceError> {
        let mut out = Vec::new();
        let mut dropped = 0usize;
        for (date, values) in self.table.days_in(region_id, window) {
            for &value in values {
                if value.is_nan() {
                    return Err(SourceError::Provider {
                        source_id: self.identifier.clone(),
                        reason: format!("NaN precipitation for '{region_id}' on {date}"),
                    });
                }
                if value < 0.0 {
                    dropped += 1;
                    continue;
                }
                out.push(RawSample::new(region_id, date, value, &self.identifier));
            }
        }
        trace!(source = %self.identifier, region = region_id, n = out.len(), dropped, "satellite fetch");
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// RiskIndex
// ---------------------------------------------------------------------------

/// A static risk index. The most recent published value for a region is
/// reported for every requested day.
#[derive(Debug, Clone)]
pub struct RiskIndex {
    identifier: String,
    table: SampleTable,
}

impl RiskIndex {
    pub fn new(identifier: impl Into<String>, table: SampleTable) -> Self {
        Self {
            identifier: identifier.into(),
            table,
        }
    }
}

impl HazardSource for RiskIndex {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn kind(&self) -> SourceKind {
        SourceKind::RiskIndex
    }

    fn fetch(&self, region_id: &str, window: &DateRange) -> Result<Vec<RawSample>, SourceError> {
        let Some((published, values)) = self.table.latest(region_id) else {
            return Ok(Vec::new());
        };
        let value = match values {
            [v] if v.is_finite() => *v,
            _ => {
                return Err(SourceError::Provider {
                    source_id: self.identifier.clone(),
                    reason: format!(
                        "expected one finite risk value for '{region_id}' published {published}, got {values:?}"
                    ),
                });
            }
        };
        Ok(window
            .iter()
            .map(|d| RawSample::new(region_id, d, value, &self.identifier))
            .collect())
    }
}
