//! Error types for hazard source adapters.

use hmhews_retry::Transient;

/// Errors raised by hazard source adapters and the source registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// The provider could not be reached. Worth retrying.
    #[error("source '{source_id}' unavailable: {reason}")]
    Unavailable { source_id: String, reason: String },

    /// The provider answered with data that cannot be used.
    #[error("source '{source_id}' returned malformed data: {reason}")]
    Provider { source_id: String, reason: String },

    /// No adapter is registered under this identifier.
    #[error("unknown hazard source '{source_id}'")]
    UnknownSource { source_id: String },
}

impl Transient for SourceError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
