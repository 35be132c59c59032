//! Provider families.

use serde::{Deserialize, Serialize};

/// The family of upstream provider an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Accumulated precipitation forecast steps (GFS-style), mm.
    Forecast,
    /// Daily satellite precipitation estimates (CHIRPS-style), mm/day.
    HistoricalSatellite,
    /// A precomputed, slowly changing flood risk index (InaRISK-style).
    RiskIndex,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Forecast => "forecast",
            Self::HistoricalSatellite => "historical_satellite",
            Self::RiskIndex => "risk_index",
        })
    }
}
