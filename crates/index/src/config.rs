//! Configuration for hazard index composition.

use std::collections::BTreeSet;

use hmhews_sources::SourceKind;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregation;
use crate::error::IndexError;
use crate::scale::Scale;

/// How normalized source components combine into one hazard value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionRule {
    /// Weighted mean over the sources that have data, weights renormalized.
    #[default]
    WeightedMean,
    /// The first source, in configured order, that has data.
    Precedence,
}

/// One source's role in the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSpec {
    identifier: String,
    kind: SourceKind,
    weight: f64,
    scale: Scale,
    aggregation: Aggregation,
    required: bool,
}

impl SourceSpec {
    /// Creates a spec with the defaults for `kind`.
    ///
    /// Defaults follow the deployed InAWARE composition: weight `0.2` and
    /// scale `[0, 1]` for risk indices, weight `0.8` and scale `[0, 50]`
    /// mm/day for precipitation. Not required.
    pub fn new(identifier: impl Into<String>, kind: SourceKind) -> Self {
        let (weight, scale) = match kind {
            SourceKind::RiskIndex => (0.2, Scale::UNIT),
            SourceKind::Forecast | SourceKind::HistoricalSatellite => {
                (0.8, Scale::PRECIPITATION_MM_DAY)
            }
        };
        Self {
            identifier: identifier.into(),
            kind,
            weight,
            scale,
            aggregation: Aggregation::default_for(kind),
            required: false,
        }
    }

    pub fn with_weight(mut self, w: f64) -> Self {
        self.weight = w;
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Cells where this source has no data become no-data cells.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    pub fn required(&self) -> bool {
        self.required
    }
}

/// The ordered source list plus the composition rule.
///
/// # Example
///
/// ```
/// use hmhews_index::{CompositionRule, IndexConfig, SourceSpec};
/// use hmhews_sources::SourceKind;
///
/// let config = IndexConfig::new()
///     .with_source(SourceSpec::new("gfs", SourceKind::Forecast))
///     .with_source(SourceSpec::new("inarisk", SourceKind::RiskIndex))
///     .with_rule(CompositionRule::WeightedMean);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexConfig {
    identifier: String,
    sources: Vec<SourceSpec>,
    rule: CompositionRule,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexConfig {
    /// Creates an empty configuration named `flood-hazard-index`.
    pub fn new() -> Self {
        Self {
            identifier: "flood-hazard-index".to_string(),
            sources: Vec::new(),
            rule: CompositionRule::default(),
        }
    }

    pub fn with_identifier(mut self, id: impl Into<String>) -> Self {
        self.identifier = id.into();
        self
    }

    /// Appends a source. Order matters for [`CompositionRule::Precedence`].
    pub fn with_source(mut self, spec: SourceSpec) -> Self {
        self.sources.push(spec);
        self
    }

    pub fn with_rule(mut self, rule: CompositionRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    pub fn rule(&self) -> CompositionRule {
        self.rule
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.sources.is_empty() {
            return Err(IndexError::InvalidConfig {
                reason: "at least one hazard source is required".to_string(),
            });
        }
        let mut seen = BTreeSet::new();
        for spec in &self.sources {
            if !seen.insert(spec.identifier.as_str()) {
                return Err(IndexError::InvalidConfig {
                    reason: format!("hazard source '{}' listed twice", spec.identifier),
                });
            }
            if !spec.weight.is_finite() || spec.weight <= 0.0 {
                return Err(IndexError::InvalidConfig {
                    reason: format!(
                        "weight of '{}' must be finite and positive, got {}",
                        spec.identifier, spec.weight
                    ),
                });
            }
        }
        Ok(())
    }
}
