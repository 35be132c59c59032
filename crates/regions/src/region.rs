//! Administrative regions.

use serde::{Deserialize, Serialize};

use crate::error::RegionError;

/// Depth in a four-level administrative hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AdminLevel {
    /// Level 0 (GADM `GID_0`).
    Country,
    /// Level 1, provinsi.
    Province,
    /// Level 2, kabupaten / kota.
    Regency,
    /// Level 3, kecamatan.
    Subdistrict,
}

impl AdminLevel {
    /// Numeric depth, 0 for country.
    pub fn depth(self) -> u8 {
        match self {
            Self::Country => 0,
            Self::Province => 1,
            Self::Regency => 2,
            Self::Subdistrict => 3,
        }
    }

    /// The level directly above, if any.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Country => None,
            Self::Province => Some(Self::Country),
            Self::Regency => Some(Self::Province),
            Self::Subdistrict => Some(Self::Regency),
        }
    }
}

impl TryFrom<u8> for AdminLevel {
    type Error = RegionError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Country),
            1 => Ok(Self::Province),
            2 => Ok(Self::Regency),
            3 => Ok(Self::Subdistrict),
            _ => Err(RegionError::InvalidLevel { level }),
        }
    }
}

impl From<AdminLevel> for u8 {
    fn from(level: AdminLevel) -> u8 {
        level.depth()
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Country => "country",
            Self::Province => "province",
            Self::Regency => "regency",
            Self::Subdistrict => "subdistrict",
        };
        f.write_str(name)
    }
}

/// One region within one hierarchy. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRegion {
    hierarchy_name: String,
    level: AdminLevel,
    region_id: String,
    canonical_name: String,
    parent_id: Option<String>,
}

impl AdminRegion {
    /// Creates a region record.
    pub fn new(
        hierarchy_name: impl Into<String>,
        level: AdminLevel,
        region_id: impl Into<String>,
        canonical_name: impl Into<String>,
        parent_id: Option<&str>,
    ) -> Self {
        Self {
            hierarchy_name: hierarchy_name.into(),
            level,
            region_id: region_id.into(),
            canonical_name: canonical_name.into(),
            parent_id: parent_id.map(str::to_string),
        }
    }

    /// Name of the hierarchy this region belongs to.
    pub fn hierarchy_name(&self) -> &str {
        &self.hierarchy_name
    }

    pub fn level(&self) -> AdminLevel {
        self.level
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}
