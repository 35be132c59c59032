//! Rows of the DIBI v3 export (`get_dibi3x`, `aaData`).
//!
//! The export mixes numbers and numeric strings freely, so every numeric
//! field accepts both. Missing counts read as zero.

use std::collections::BTreeMap;

use hmhews_calendar::parse_date;
use hmhews_regions::{AdminLevel, AdminRegion, Hierarchy};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::EventError;
use crate::event::{DisasterEvent, EventType, HouseDamage, Severity, Victims};

/// One event row as served by DIBI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DibiRow {
    /// Province code, e.g. `32`.
    #[serde(deserialize_with = "code")]
    pub level0: String,
    /// District code, either the two-digit suffix (`04`) or the full code (`3204`).
    #[serde(deserialize_with = "code")]
    pub level1: String,
    /// Province name.
    #[serde(default)]
    pub nprop: String,
    /// District name.
    #[serde(default)]
    pub nkab: String,
    /// HTML cell holding the `/d/r/<id>` incident link.
    #[serde(default)]
    pub kejadian: String,
    /// Event date, `YYYY-MM-DD`.
    #[serde(default)]
    pub tglan: String,
    /// Disaster type code.
    #[serde(default, deserialize_with = "code")]
    pub idj: String,
    #[serde(default, deserialize_with = "count")]
    pub meninggal: u32,
    #[serde(default, deserialize_with = "count")]
    pub hilang: u32,
    #[serde(default, deserialize_with = "count")]
    pub terluka: u32,
    #[serde(default, deserialize_with = "count")]
    pub menderita: u32,
    #[serde(default, deserialize_with = "count")]
    pub mengungsi: u32,
    #[serde(default, deserialize_with = "count")]
    pub rumah_rusak_berat: u32,
    #[serde(default, deserialize_with = "count")]
    pub rumah_rusak_sedang: u32,
    #[serde(default, deserialize_with = "count")]
    pub rumah_rusak_ringan: u32,
    #[serde(default, deserialize_with = "count")]
    pub rumah_terendam: u32,
}

impl DibiRow {
    /// Province id in the disaster database.
    pub fn province_id(&self) -> &str {
        &self.level0
    }

    /// Full district id: province code followed by the two-digit district code.
    pub fn district_id(&self) -> String {
        if self.level1.len() <= 2 {
            format!("{}{:0>2}", self.level0, self.level1)
        } else {
            self.level1.clone()
        }
    }

    /// Incident number taken from the `/d/r/<id>` link.
    pub fn incident_id(&self) -> Option<&str> {
        let rest = &self.kejadian[self.kejadian.find("/d/r/")? + "/d/r/".len()..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    }

    pub fn severity(&self) -> Severity {
        Severity {
            victims: Victims {
                died: self.meninggal,
                missing: self.hilang,
                injured: self.terluka,
                suffering: self.menderita,
                evacuated: self.mengungsi,
            },
            houses: HouseDamage {
                severe: self.rumah_rusak_berat,
                moderate: self.rumah_rusak_sedang,
                light: self.rumah_rusak_ringan,
                submerged: self.rumah_terendam,
            },
        }
    }

    /// Converts the row into a district-level event.
    ///
    /// `index` is only used in error messages.
    pub fn to_event(&self, index: usize) -> Result<DisasterEvent, EventError> {
        let malformed = |reason: String| EventError::MalformedRow { index, reason };
        let id = self
            .incident_id()
            .ok_or_else(|| malformed(format!("no incident link in '{}'", self.kejadian)))?;
        if self.level0.is_empty() || self.level1.is_empty() {
            return Err(malformed("missing province or district code".to_string()));
        }
        let date = parse_date(&self.tglan).map_err(|e| malformed(e.to_string()))?;
        Ok(DisasterEvent::new(id, self.district_id(), date, EventType::from(self.idj.as_str()))
            .with_severity(self.severity()))
    }
}

/// Events converted from export rows, with the count of rows dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowEvents {
    pub events: Vec<DisasterEvent>,
    pub skipped: u64,
}

/// Converts export rows into events. Malformed rows are counted in
/// [`RowEvents::skipped`] and logged at warn.
pub fn events_from_rows(rows: &[DibiRow]) -> RowEvents {
    let mut converted = RowEvents {
        events: Vec::with_capacity(rows.len()),
        skipped: 0,
    };
    for (index, row) in rows.iter().enumerate() {
        match row.to_event(index) {
            Ok(event) => converted.events.push(event),
            Err(e) => {
                converted.skipped += 1;
                warn!(error = %e, "skipping DIBI row");
            }
        }
    }
    if converted.skipped > 0 {
        warn!(skipped = converted.skipped, rows = rows.len(), "DIBI rows dropped from ground truth");
    }
    converted
}

/// Derives the disaster-database hierarchy (provinces and districts) named
/// `name` from an export. The first name seen for an id wins.
pub fn hierarchy_from_rows(name: &str, rows: &[DibiRow]) -> Result<Hierarchy, EventError> {
    let mut provinces: BTreeMap<String, String> = BTreeMap::new();
    let mut districts: BTreeMap<String, (String, String)> = BTreeMap::new();
    for row in rows {
        if row.level0.is_empty() {
            continue;
        }
        provinces
            .entry(row.level0.clone())
            .or_insert_with(|| row.nprop.trim().to_string());
        if !row.level1.is_empty() {
            districts
                .entry(row.district_id())
                .or_insert_with(|| (row.nkab.trim().to_string(), row.level0.clone()));
        }
    }

    let mut regions: Vec<AdminRegion> = provinces
        .into_iter()
        .map(|(id, pname)| AdminRegion::new(name, AdminLevel::Province, id, pname, None))
        .collect();
    regions.extend(districts.into_iter().map(|(id, (dname, parent))| {
        AdminRegion::new(name, AdminLevel::Regency, id, dname, Some(parent.as_str()))
    }));
    Ok(Hierarchy::new(name, regions)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(u64),
    Str(String),
}

fn code<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match NumOrStr::deserialize(d)? {
        NumOrStr::Num(n) => n.to_string(),
        NumOrStr::Str(s) => s.trim().to_string(),
    })
}

fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    match Option::<NumOrStr>::deserialize(d)? {
        None => Ok(0),
        Some(NumOrStr::Num(n)) => u32::try_from(n).map_err(serde::de::Error::custom),
        Some(NumOrStr::Str(s)) if s.trim().is_empty() => Ok(0),
        Some(NumOrStr::Str(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
