//! Manual override tables as TOML.
//!
//! One key per boundary region; the value is the disaster-database id, or
//! an empty string to mark the region as deliberately unresolved:
//!
//! ```toml
//! "IDN.12.4_1" = "3204"
//! "IDN.31.1_1" = ""
//! ```

use std::path::Path;

use hmhews_regions::OverrideTable;
use tracing::info;

use crate::error::IoError;

/// Reads an override table.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] or [`IoError::Toml`].
pub fn read_overrides(path: &Path) -> Result<OverrideTable, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let to_err = |reason: String| IoError::Toml {
        path: path.to_path_buf(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| to_err(e.to_string()))?;
    let table: OverrideTable = toml::from_str(&text).map_err(|e| to_err(e.to_string()))?;
    info!(path = %path.display(), entries = table.len(), "overrides loaded");
    Ok(table)
}

/// Writes an override table, typically a template for unresolved regions.
///
/// # Errors
///
/// Returns [`IoError::Toml`] if serialization or the write fails.
pub fn write_overrides(path: &Path, table: &OverrideTable) -> Result<(), IoError> {
    let to_err = |reason: String| IoError::Toml {
        path: path.to_path_buf(),
        reason,
    };
    let text = toml::to_string(table).map_err(|e| to_err(e.to_string()))?;
    std::fs::write(path, text).map_err(|e| to_err(e.to_string()))?;
    info!(path = %path.display(), entries = table.len(), "overrides written");
    Ok(())
}
