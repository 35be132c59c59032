//! Manual corrections to automatic identity matching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RegionError;
use crate::hierarchy::Hierarchy;

/// What an operator decided for one boundary region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideEntry {
    /// Link to this disaster-database region id.
    Link(String),
    /// Keep the region unresolved even if a name would match.
    Unresolved,
}

/// Boundary region id → operator decision.
///
/// In TOML an empty string means [`OverrideEntry::Unresolved`]:
///
/// ```toml
/// "IDN.9.1_1" = "3204"
/// "IDN.9.2_1" = ""
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct OverrideTable {
    entries: BTreeMap<String, OverrideEntry>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `source_id` to `target_id`, replacing any previous entry.
    pub fn with_link(mut self, source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        self.insert(source_id, OverrideEntry::Link(target_id.into()));
        self
    }

    /// Marks `source_id` as deliberately unresolved.
    pub fn with_unresolved(mut self, source_id: impl Into<String>) -> Self {
        self.insert(source_id, OverrideEntry::Unresolved);
        self
    }

    pub fn insert(&mut self, source_id: impl Into<String>, entry: OverrideEntry) {
        self.entries.insert(source_id.into(), entry);
    }

    pub fn get(&self, source_id: &str) -> Option<&OverrideEntry> {
        self.entries.get(source_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries ordered by boundary id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Checks that every key is a boundary region and every link target a
    /// disaster-database region at the same administrative level. Stops at
    /// the first problem.
    pub fn validate(&self, boundary: &Hierarchy, disaster: &Hierarchy) -> Result<(), RegionError> {
        for (source_id, entry) in &self.entries {
            let Some(source) = boundary.get(source_id) else {
                return Err(RegionError::UnknownOverrideSource {
                    source_id: source_id.clone(),
                    hierarchy: boundary.name().to_string(),
                });
            };
            let OverrideEntry::Link(target_id) = entry else {
                continue;
            };
            let Some(target) = disaster.get(target_id) else {
                return Err(RegionError::UnknownOverrideTarget {
                    source_id: source_id.clone(),
                    target_id: target_id.clone(),
                    hierarchy: disaster.name().to_string(),
                });
            };
            if source.level() != target.level() {
                return Err(RegionError::OverrideLevelMismatch {
                    source_id: source_id.clone(),
                    source_level: source.level(),
                    target_id: target_id.clone(),
                    target_level: target.level(),
                });
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<String, String>> for OverrideTable {
    fn from(raw: BTreeMap<String, String>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(source, target)| {
                let target = target.trim();
                let entry = if target.is_empty() {
                    OverrideEntry::Unresolved
                } else {
                    OverrideEntry::Link(target.to_string())
                };
                (source, entry)
            })
            .collect();
        Self { entries }
    }
}

impl From<OverrideTable> for BTreeMap<String, String> {
    fn from(table: OverrideTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(source, entry)| match entry {
                OverrideEntry::Link(target) => (source, target),
                OverrideEntry::Unresolved => (source, String::new()),
            })
            .collect()
    }
}
