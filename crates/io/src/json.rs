//! JSON inputs (region lists, DIBI exports) and JSON report output.

use std::path::Path;

use hmhews_events::dibi::DibiRow;
use hmhews_regions::{AdminLevel, AdminRegion, Hierarchy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IoError;

/// One entry of a region list file.
///
/// ```json
/// [
///   {"region_id": "IDN.12_1", "name": "Jawa Barat", "level": 1, "parent_id": "IDN"},
///   {"region_id": "IDN.12.4_1", "name": "Bandung", "level": 2, "parent_id": "IDN.12_1"}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub region_id: String,
    pub name: String,
    pub level: AdminLevel,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl RegionRecord {
    fn into_region(self, hierarchy: &str) -> AdminRegion {
        AdminRegion::new(
            hierarchy,
            self.level,
            self.region_id,
            self.name,
            self.parent_id.as_deref(),
        )
    }
}

/// DIBI serves `{"aaData": [...]}`; saved exports are sometimes the bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum DibiExport {
    Wrapped {
        #[serde(rename = "aaData")]
        aa_data: Vec<DibiRow>,
    },
    Bare(Vec<DibiRow>),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Loads a region list and validates it as the hierarchy `name`.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Json`] for unreadable
/// content, or [`IoError::Region`] when the regions do not form a valid
/// hierarchy.
pub fn read_hierarchy(path: &Path, name: &str) -> Result<Hierarchy, IoError> {
    let records: Vec<RegionRecord> = read_json(path)?;
    let regions = records.into_iter().map(|r| r.into_region(name)).collect();
    let hierarchy = Hierarchy::new(name, regions)?;
    info!(path = %path.display(), hierarchy = name, regions = hierarchy.len(), "hierarchy loaded");
    Ok(hierarchy)
}

/// Loads the rows of a DIBI export.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] or [`IoError::Json`].
pub fn read_dibi_export(path: &Path) -> Result<Vec<DibiRow>, IoError> {
    let rows = match read_json::<DibiExport>(path)? {
        DibiExport::Wrapped { aa_data } => aa_data,
        DibiExport::Bare(rows) => rows,
    };
    info!(path = %path.display(), rows = rows.len(), "dibi export loaded");
    Ok(rows)
}

/// Writes `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`IoError::Json`] if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    let to_err = |reason: String| IoError::Json {
        path: path.to_path_buf(),
        reason,
    };
    let mut text = serde_json::to_string_pretty(value).map_err(|e| to_err(e.to_string()))?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| to_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_parent_is_optional() {
        let r: RegionRecord =
            serde_json::from_str(r#"{"region_id": "IDN", "name": "Indonesia", "level": 0}"#).unwrap();
        assert_eq!(r.parent_id, None);
        assert_eq!(r.level, AdminLevel::Country);
    }

    #[test]
    fn record_rejects_unknown_level() {
        let r = serde_json::from_str::<RegionRecord>(r#"{"region_id": "x", "name": "x", "level": 5}"#);
        assert!(r.is_err());
    }

    #[test]
    fn export_accepts_both_shapes() {
        let row = r#"{"level0": "32", "level1": "04", "tglan": "2022-12-01", "idj": "101"}"#;
        let wrapped: DibiExport = serde_json::from_str(&format!(r#"{{"aaData": [{row}]}}"#)).unwrap();
        let bare: DibiExport = serde_json::from_str(&format!("[{row}, {row}]")).unwrap();
        assert!(matches!(wrapped, DibiExport::Wrapped { ref aa_data } if aa_data.len() == 1));
        assert!(matches!(bare, DibiExport::Bare(ref rows) if rows.len() == 2));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_dibi_export(Path::new("/nonexistent/dibi.json")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
