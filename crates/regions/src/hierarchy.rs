//! Validated region hierarchies.

use std::collections::BTreeMap;

use crate::error::RegionError;
use crate::region::{AdminLevel, AdminRegion};

/// All regions of one administrative dataset, keyed by `region_id`.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    name: String,
    regions: BTreeMap<String, AdminRegion>,
}

impl Hierarchy {
    /// Builds a hierarchy from a flat region list.
    ///
    /// # Validation
    ///
    /// - Every region carries this hierarchy's name
    /// - `region_id` is unique
    /// - A country-level region has no parent
    /// - A declared parent exists and sits exactly one level above
    ///
    /// Regions at the top of a partial dataset (for example provinces without
    /// a country row) may omit their parent.
    pub fn new(name: impl Into<String>, regions: Vec<AdminRegion>) -> Result<Self, RegionError> {
        let name = name.into();
        let mut errors = Vec::new();
        let mut map: BTreeMap<String, AdminRegion> = BTreeMap::new();

        for region in regions {
            if region.hierarchy_name() != name {
                errors.push(format!(
                    "region '{}' belongs to hierarchy '{}'",
                    region.region_id(),
                    region.hierarchy_name()
                ));
                continue;
            }
            if map.contains_key(region.region_id()) {
                errors.push(format!("duplicate region id '{}'", region.region_id()));
                continue;
            }
            map.insert(region.region_id().to_string(), region);
        }

        for region in map.values() {
            let Some(parent_id) = region.parent_id() else {
                continue;
            };
            match (region.level().parent(), map.get(parent_id)) {
                (None, _) => errors.push(format!(
                    "country-level region '{}' declares parent '{}'",
                    region.region_id(),
                    parent_id
                )),
                (Some(_), None) => errors.push(format!(
                    "region '{}' has unknown parent '{}'",
                    region.region_id(),
                    parent_id
                )),
                (Some(expected), Some(parent)) if parent.level() != expected => {
                    errors.push(format!(
                        "region '{}' ({}) has parent '{}' at level {}, expected {}",
                        region.region_id(),
                        region.level(),
                        parent_id,
                        parent.level(),
                        expected
                    ))
                }
                _ => {}
            }
        }

        if !errors.is_empty() {
            return Err(RegionError::Validation {
                hierarchy: name,
                count: errors.len(),
                details: errors.join("; "),
            });
        }

        Ok(Self { name, regions: map })
    }

    /// Returns the hierarchy name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a region by id.
    pub fn get(&self, region_id: &str) -> Option<&AdminRegion> {
        self.regions.get(region_id)
    }

    /// Returns true if the hierarchy holds `region_id`.
    pub fn contains(&self, region_id: &str) -> bool {
        self.regions.contains_key(region_id)
    }

    /// Number of regions across all levels.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over all regions ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &AdminRegion> {
        self.regions.values()
    }

    /// Iterates over regions of one level, ordered by id.
    pub fn at_level(&self, level: AdminLevel) -> impl Iterator<Item = &AdminRegion> {
        self.regions.values().filter(move |r| r.level() == level)
    }

    /// Iterates over the direct children of `parent_id`.
    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a AdminRegion> {
        self.regions
            .values()
            .filter(move |r| r.parent_id() == Some(parent_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(level: AdminLevel, id: &str, name: &str, parent: Option<&str>) -> AdminRegion {
        AdminRegion::new("gadm", level, id, name, parent)
    }

    fn java() -> Vec<AdminRegion> {
        vec![
            region(AdminLevel::Country, "IDN", "Indonesia", None),
            region(AdminLevel::Province, "IDN.9_1", "Jawa Barat", Some("IDN")),
            region(AdminLevel::Regency, "IDN.9.1_1", "Bandung", Some("IDN.9_1")),
            region(AdminLevel::Regency, "IDN.9.2_1", "Bandung Barat", Some("IDN.9_1")),
        ]
    }

    #[test]
    fn test_valid_hierarchy() {
        let h = Hierarchy::new("gadm", java()).unwrap();
        assert_eq!(h.len(), 4);
        assert_eq!(h.name(), "gadm");
        assert_eq!(h.at_level(AdminLevel::Regency).count(), 2);
        assert_eq!(h.children_of("IDN.9_1").count(), 2);
        assert!(h.contains("IDN"));
        assert_eq!(h.get("IDN.9.1_1").unwrap().canonical_name(), "Bandung");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut regions = java();
        regions.push(region(AdminLevel::Regency, "IDN.9.1_1", "Bandung", Some("IDN.9_1")));
        let err = Hierarchy::new("gadm", regions).unwrap_err();
        match err {
            RegionError::Validation { count, details, .. } => {
                assert_eq!(count, 1);
                assert!(details.contains("duplicate region id 'IDN.9.1_1'"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_parent_and_wrong_level_accumulate() {
        let regions = vec![
            region(AdminLevel::Province, "P", "Banten", None),
            region(AdminLevel::Regency, "R1", "Serang", Some("missing")),
            region(AdminLevel::Subdistrict, "S1", "Cilegon", Some("P")),
        ];
        let err = Hierarchy::new("gadm", regions).unwrap_err();
        match err {
            RegionError::Validation { count, details, .. } => {
                assert_eq!(count, 2);
                assert!(details.contains("unknown parent 'missing'"));
                assert!(details.contains("expected regency"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_hierarchy_rejected() {
        let regions = vec![AdminRegion::new("dibi", AdminLevel::Province, "32", "JAWA BARAT", None)];
        assert!(Hierarchy::new("gadm", regions).is_err());
    }

    #[test]
    fn test_partial_top_level_allowed() {
        let regions = vec![
            region(AdminLevel::Province, "P", "Bali", None),
            region(AdminLevel::Regency, "R", "Badung", Some("P")),
        ];
        assert!(Hierarchy::new("gadm", regions).is_ok());
    }
}
