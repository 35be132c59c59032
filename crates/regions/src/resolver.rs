//! Automatic identity resolution between two hierarchies.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::RegionError;
use crate::hierarchy::Hierarchy;
use crate::normalize::normalize_name;
use crate::overrides::{OverrideEntry, OverrideTable};
use crate::region::{AdminLevel, AdminRegion};
use crate::table::{IdentityTable, MatchMethod, RegionIdentityLink, Resolution, UnresolvedReason};

const LEVELS: [AdminLevel; 4] = [
    AdminLevel::Country,
    AdminLevel::Province,
    AdminLevel::Regency,
    AdminLevel::Subdistrict,
];

/// Builds [`IdentityTable`]s. Holds the operator's overrides.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    overrides: OverrideTable,
}

impl IdentityResolver {
    pub fn new(overrides: OverrideTable) -> Self {
        Self { overrides }
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Resolves every region of `boundary` against `disaster`.
    ///
    /// Levels are processed top-down so that a linked parent narrows the
    /// candidate set of its children. Within a level, overrides are applied
    /// first, then exact name, then normalized name.
    ///
    /// # Errors
    ///
    /// Returns an error only when the override table refers to ids that do
    /// not exist. Unmatched regions are reported in the table, not as errors.
    pub fn resolve(
        &self,
        boundary: &Hierarchy,
        disaster: &Hierarchy,
    ) -> Result<IdentityTable, RegionError> {
        self.overrides.validate(boundary, disaster)?;

        let normalized: BTreeMap<&str, String> = disaster
            .iter()
            .map(|r| (r.region_id(), normalize_name(r.canonical_name())))
            .collect();

        let mut entries: BTreeMap<String, Resolution> = BTreeMap::new();
        for level in LEVELS {
            for region in boundary.at_level(level) {
                let resolution = self.resolve_one(region, disaster, &normalized, &entries);
                debug!(region = region.region_id(), ?resolution, "resolved");
                entries.insert(region.region_id().to_string(), resolution);
            }
        }

        let table = IdentityTable::new(boundary.name(), disaster.name(), entries);
        let counts = table.counts();
        info!(
            boundary = boundary.name(),
            disaster = disaster.name(),
            linked = counts.linked(),
            unresolved = counts.unresolved(),
            "identity resolution complete"
        );
        Ok(table)
    }

    fn resolve_one(
        &self,
        region: &AdminRegion,
        disaster: &Hierarchy,
        normalized: &BTreeMap<&str, String>,
        resolved: &BTreeMap<String, Resolution>,
    ) -> Resolution {
        let source_id = region.region_id();
        match self.overrides.get(source_id) {
            Some(OverrideEntry::Link(target)) => {
                return Resolution::Linked(RegionIdentityLink::new(
                    source_id,
                    target.as_str(),
                    MatchMethod::ManualOverride,
                ));
            }
            Some(OverrideEntry::Unresolved) => {
                return Resolution::Unresolved {
                    reason: UnresolvedReason::ManualOverride,
                };
            }
            None => {}
        }

        let scope = region
            .parent_id()
            .and_then(|p| match resolved.get(p) {
                Some(Resolution::Linked(link)) => Some(link.target_id()),
                _ => None,
            });
        let candidates: Vec<&AdminRegion> = disaster
            .at_level(region.level())
            .filter(|c| scope.is_none_or(|parent| c.parent_id() == Some(parent)))
            .collect();

        let exact: Vec<&AdminRegion> = candidates
            .iter()
            .copied()
            .filter(|c| c.canonical_name() == region.canonical_name())
            .collect();
        if let Some(resolution) = pick(source_id, &exact, MatchMethod::ExactName) {
            return resolution;
        }

        let key = normalize_name(region.canonical_name());
        let loose: Vec<&AdminRegion> = candidates
            .iter()
            .copied()
            .filter(|c| !key.is_empty() && normalized.get(c.region_id()) == Some(&key))
            .collect();
        pick(source_id, &loose, MatchMethod::NormalizedName).unwrap_or(Resolution::Unresolved {
            reason: UnresolvedReason::NoMatch,
        })
    }
}

fn pick(source_id: &str, matches: &[&AdminRegion], method: MatchMethod) -> Option<Resolution> {
    match matches {
        [] => None,
        [single] => Some(Resolution::Linked(RegionIdentityLink::new(
            source_id,
            single.region_id(),
            method,
        ))),
        _ => Some(Resolution::Unresolved {
            reason: UnresolvedReason::Ambiguous,
        }),
    }
}
