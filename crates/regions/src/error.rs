//! Error types for hierarchy validation and identity resolution.

use crate::region::AdminLevel;

/// Errors raised while loading hierarchies or resolving identities.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegionError {
    /// One or more hierarchy validation checks failed.
    #[error("hierarchy '{hierarchy}': {count} validation error(s): {details}")]
    Validation {
        hierarchy: String,
        count: usize,
        details: String,
    },

    /// An administrative level number outside 0..=3.
    #[error("invalid administrative level: {level} (must be 0..=3)")]
    InvalidLevel { level: u8 },

    /// A manual override points at a region the disaster database does not have.
    #[error("override for '{source_id}' targets unknown region '{target_id}' in '{hierarchy}'")]
    UnknownOverrideTarget {
        source_id: String,
        target_id: String,
        hierarchy: String,
    },

    /// A manual override links regions at different administrative levels.
    #[error(
        "override for '{source_id}' ({source_level}) targets '{target_id}' at another level ({target_level})"
    )]
    OverrideLevelMismatch {
        source_id: String,
        source_level: AdminLevel,
        target_id: String,
        target_level: AdminLevel,
    },

    /// A manual override is keyed by a region the boundary dataset does not have.
    #[error("override key '{source_id}' is not a region of '{hierarchy}'")]
    UnknownOverrideSource { source_id: String, hierarchy: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = RegionError::Validation {
            hierarchy: "gadm".to_string(),
            count: 2,
            details: "duplicate id 'a'; unknown parent 'b'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("hierarchy 'gadm'"));
        assert!(msg.contains("2 validation error(s)"));
    }

    #[test]
    fn test_invalid_level_display() {
        let err = RegionError::InvalidLevel { level: 7 };
        assert_eq!(
            err.to_string(),
            "invalid administrative level: 7 (must be 0..=3)"
        );
    }

    #[test]
    fn test_unknown_override_target_display() {
        let err = RegionError::UnknownOverrideTarget {
            source_id: "IDN.9.1_1".to_string(),
            target_id: "9999".to_string(),
            hierarchy: "dibi".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("IDN.9.1_1"));
        assert!(msg.contains("unknown region '9999'"));
    }

    #[test]
    fn test_override_level_mismatch_display() {
        let err = RegionError::OverrideLevelMismatch {
            source_id: "IDN.9.4_1".to_string(),
            source_level: AdminLevel::Regency,
            target_id: "32".to_string(),
            target_level: AdminLevel::Province,
        };
        assert_eq!(
            err.to_string(),
            "override for 'IDN.9.4_1' (regency) targets '32' at another level (province)"
        );
    }

    #[test]
    fn test_unknown_override_source_display() {
        let err = RegionError::UnknownOverrideSource {
            source_id: "nowhere".to_string(),
            hierarchy: "gadm".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "override key 'nowhere' is not a region of 'gadm'"
        );
    }
}
