//! Error types for event stores and DIBI export handling.

use hmhews_regions::RegionError;
use hmhews_retry::Transient;

/// Errors raised by an [`EventStore`](crate::EventStore).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached. Worth retrying.
    #[error("event store '{store}' unavailable: {reason}")]
    Unavailable { store: String, reason: String },

    /// The store answered, but the query was rejected.
    #[error("event store '{store}' rejected query for '{region_id}': {reason}")]
    Query {
        store: String,
        region_id: String,
        reason: String,
    },
}

impl Transient for StoreError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Errors raised while turning export rows into events or regions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// A row lacks a field needed to build an event.
    #[error("malformed DIBI row {index}: {reason}")]
    MalformedRow { index: usize, reason: String },

    /// The derived region hierarchy failed validation.
    #[error(transparent)]
    Region(#[from] RegionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_is_transient() {
        let err = StoreError::Unavailable {
            store: "dibi".to_string(),
            reason: "HTTP 503".to_string(),
        };
        assert_eq!(err.to_string(), "event store 'dibi' unavailable: HTTP 503");
        assert!(err.is_transient());
    }

    #[test]
    fn test_query_is_permanent() {
        let err = StoreError::Query {
            store: "dibi".to_string(),
            region_id: "3204".to_string(),
            reason: "unknown district".to_string(),
        };
        assert!(err.to_string().contains("'3204'"));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_malformed_row_display() {
        let err = EventError::MalformedRow {
            index: 12,
            reason: "missing incident link".to_string(),
        };
        assert_eq!(err.to_string(), "malformed DIBI row 12: missing incident link");
    }

    #[test]
    fn test_region_error_is_transparent() {
        let err = EventError::from(RegionError::InvalidLevel { level: 9 });
        assert_eq!(
            err.to_string(),
            "invalid administrative level: 9 (must be 0..=3)"
        );
    }
}
