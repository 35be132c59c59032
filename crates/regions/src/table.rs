//! The resolved identity lookup between two hierarchies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::overrides::OverrideTable;

/// How a link was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    ExactName,
    NormalizedName,
    ManualOverride,
}

/// Why a boundary region has no link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No candidate matched by exact or normalized name.
    NoMatch,
    /// More than one candidate matched at the same stage.
    Ambiguous,
    /// An operator chose to leave the region unresolved.
    ManualOverride,
}

/// Association of one boundary region with one disaster-database region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionIdentityLink {
    source_id: String,
    target_id: String,
    method: MatchMethod,
}

impl RegionIdentityLink {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, method: MatchMethod) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            method,
        }
    }

    /// Boundary-hierarchy region id.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Disaster-database region id.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn method(&self) -> MatchMethod {
        self.method
    }
}

/// Outcome of resolving one boundary region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Linked(RegionIdentityLink),
    Unresolved { reason: UnresolvedReason },
}

/// Link counts per match method plus unresolved counts per reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchCounts {
    pub exact_name: usize,
    pub normalized_name: usize,
    pub manual_override: usize,
    pub no_match: usize,
    pub ambiguous: usize,
    pub manual_unresolved: usize,
}

impl MatchCounts {
    pub fn linked(&self) -> usize {
        self.exact_name + self.normalized_name + self.manual_override
    }

    pub fn unresolved(&self) -> usize {
        self.no_match + self.ambiguous + self.manual_unresolved
    }
}

/// Bidirectional identity lookup, built once per run.
///
/// Every boundary region the resolver saw has exactly one entry, either
/// linked or unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityTable {
    boundary: String,
    disaster: String,
    entries: BTreeMap<String, Resolution>,
    #[serde(skip)]
    reverse: BTreeMap<String, Vec<String>>,
}

impl IdentityTable {
    pub(crate) fn new(
        boundary: impl Into<String>,
        disaster: impl Into<String>,
        entries: BTreeMap<String, Resolution>,
    ) -> Self {
        let mut reverse: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for resolution in entries.values() {
            if let Resolution::Linked(link) = resolution {
                reverse
                    .entry(link.target_id.clone())
                    .or_default()
                    .push(link.source_id.clone());
            }
        }
        Self {
            boundary: boundary.into(),
            disaster: disaster.into(),
            entries,
            reverse,
        }
    }

    /// Builds a table directly from resolutions keyed by boundary id.
    pub fn from_resolutions(
        boundary: impl Into<String>,
        disaster: impl Into<String>,
        resolutions: impl IntoIterator<Item = (String, Resolution)>,
    ) -> Self {
        Self::new(boundary, disaster, resolutions.into_iter().collect())
    }

    /// Name of the boundary hierarchy.
    pub fn boundary_name(&self) -> &str {
        &self.boundary
    }

    /// Name of the disaster-database hierarchy.
    pub fn disaster_name(&self) -> &str {
        &self.disaster
    }

    pub fn resolution(&self, boundary_id: &str) -> Option<&Resolution> {
        self.entries.get(boundary_id)
    }

    pub fn link(&self, boundary_id: &str) -> Option<&RegionIdentityLink> {
        match self.entries.get(boundary_id) {
            Some(Resolution::Linked(link)) => Some(link),
            _ => None,
        }
    }

    /// Disaster-database id for a boundary region, if linked.
    pub fn target(&self, boundary_id: &str) -> Option<&str> {
        self.link(boundary_id).map(RegionIdentityLink::target_id)
    }

    /// Boundary regions linked to `disaster_id`, ordered by id.
    pub fn sources_of(&self, disaster_id: &str) -> &[String] {
        self.reverse
            .get(disaster_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Unresolved boundary regions with their reason, ordered by id.
    pub fn unresolved(&self) -> impl Iterator<Item = (&str, UnresolvedReason)> {
        self.entries.iter().filter_map(|(id, r)| match r {
            Resolution::Unresolved { reason } => Some((id.as_str(), *reason)),
            Resolution::Linked(_) => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.entries.iter().map(|(id, r)| (id.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn counts(&self) -> MatchCounts {
        let mut counts = MatchCounts::default();
        for resolution in self.entries.values() {
            match resolution {
                Resolution::Linked(link) => match link.method {
                    MatchMethod::ExactName => counts.exact_name += 1,
                    MatchMethod::NormalizedName => counts.normalized_name += 1,
                    MatchMethod::ManualOverride => counts.manual_override += 1,
                },
                Resolution::Unresolved { reason } => match reason {
                    UnresolvedReason::NoMatch => counts.no_match += 1,
                    UnresolvedReason::Ambiguous => counts.ambiguous += 1,
                    UnresolvedReason::ManualOverride => counts.manual_unresolved += 1,
                },
            }
        }
        counts
    }

    /// Override stub listing every unresolved region as "leave unresolved",
    /// ready for an operator to fill in targets.
    pub fn override_template(&self) -> OverrideTable {
        self.unresolved()
            .fold(OverrideTable::new(), |table, (id, _)| table.with_unresolved(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::OverrideEntry;

    fn sample() -> IdentityTable {
        IdentityTable::from_resolutions(
            "gadm",
            "dibi",
            vec![
                (
                    "a".to_string(),
                    Resolution::Linked(RegionIdentityLink::new("a", "3204", MatchMethod::ExactName)),
                ),
                (
                    "b".to_string(),
                    Resolution::Linked(RegionIdentityLink::new("b", "3204", MatchMethod::NormalizedName)),
                ),
                (
                    "c".to_string(),
                    Resolution::Unresolved {
                        reason: UnresolvedReason::Ambiguous,
                    },
                ),
            ],
        )
    }

    #[test]
    fn lookups_both_directions() {
        let table = sample();
        assert_eq!(table.target("a"), Some("3204"));
        assert_eq!(table.target("c"), None);
        assert_eq!(table.target("zzz"), None);
        assert_eq!(table.sources_of("3204"), ["a".to_string(), "b".to_string()]);
        assert!(table.sources_of("9999").is_empty());
    }

    #[test]
    fn counts_by_method() {
        let counts = sample().counts();
        assert_eq!(counts.exact_name, 1);
        assert_eq!(counts.normalized_name, 1);
        assert_eq!(counts.ambiguous, 1);
        assert_eq!(counts.linked(), 2);
        assert_eq!(counts.unresolved(), 1);
    }

    #[test]
    fn template_lists_unresolved_only() {
        let template = sample().override_template();
        assert_eq!(template.len(), 1);
        assert_eq!(template.get("c"), Some(&OverrideEntry::Unresolved));
    }

    #[test]
    fn serializes_status_tag() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains(r#""status":"linked""#));
        assert!(json.contains(r#""reason":"ambiguous""#));
        assert!(!json.contains("reverse"));
    }
}
