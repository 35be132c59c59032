//! Reduction of one day's raw samples to a single value.

use serde::{Deserialize, Serialize};

use hmhews_sources::SourceKind;

/// How several raw samples on one day combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Daily accumulation; forecast steps add up.
    Sum,
    Max,
    Mean,
}

impl Aggregation {
    /// Sum for precipitation, max for risk indices.
    pub fn default_for(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Forecast | SourceKind::HistoricalSatellite => Self::Sum,
            SourceKind::RiskIndex => Self::Max,
        }
    }

    /// Returns `None` for an empty day.
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(match self {
            Self::Sum => values.iter().sum(),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_none() {
        assert_eq!(Aggregation::Sum.apply(&[]), None);
        assert_eq!(Aggregation::Max.apply(&[]), None);
    }

    #[test]
    fn reductions() {
        let v = [2.0, 6.0, 1.0];
        assert_eq!(Aggregation::Sum.apply(&v), Some(9.0));
        assert_eq!(Aggregation::Max.apply(&v), Some(6.0));
        assert_eq!(Aggregation::Mean.apply(&v), Some(3.0));
    }

    #[test]
    fn defaults_by_kind() {
        assert_eq!(Aggregation::default_for(SourceKind::Forecast), Aggregation::Sum);
        assert_eq!(Aggregation::default_for(SourceKind::RiskIndex), Aggregation::Max);
    }
}
