//! Error types for the hmhews-index crate.

use hmhews_sources::SourceError;

/// Error type for hazard index configuration and construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    /// Returned when configuration is invalid.
    #[error("invalid index configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a scale has `max <= min` or non-finite bounds.
    #[error("invalid scale [{min}, {max}]")]
    InvalidScale {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Returned when a threshold lies outside its scale.
    #[error("threshold {value} outside [0, {scale_max}]")]
    InvalidThreshold {
        /// Configured threshold.
        value: f64,
        /// Upper end of the threshold's scale.
        scale_max: f64,
    },

    /// Source lookup failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = IndexError::InvalidConfig {
            reason: "no sources".to_string(),
        };
        assert_eq!(err.to_string(), "invalid index configuration: no sources");
    }

    #[test]
    fn test_invalid_scale_display() {
        let err = IndexError::InvalidScale { min: 5.0, max: 1.0 };
        assert_eq!(err.to_string(), "invalid scale [5, 1]");
    }

    #[test]
    fn test_invalid_threshold_display() {
        let err = IndexError::InvalidThreshold {
            value: 11.0,
            scale_max: 10.0,
        };
        assert_eq!(err.to_string(), "threshold 11 outside [0, 10]");
    }

    #[test]
    fn test_source_error_is_transparent() {
        let err: IndexError = SourceError::UnknownSource {
            source_id: "gfs".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "unknown hazard source 'gfs'");
    }
}
