//! Evaluation error types.

/// Errors that abort a backtest run.
///
/// Per-cell problems (unresolved regions, missing hazard data, failing
/// adapters) are never errors; they are counted in the report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluateError {
    /// Configuration rejected before any fetch.
    #[error("invalid backtest configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The ground-truth store stayed unreachable after retries.
    #[error("ground-truth store '{store}' unavailable: {reason}")]
    UpstreamUnavailable { store: String, reason: String },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = EvaluateError::InvalidConfig {
            reason: "region filter is empty".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("invalid backtest configuration"));
        assert!(msg.contains("region filter is empty"));
    }

    #[test]
    fn test_upstream_unavailable_display() {
        let err = EvaluateError::UpstreamUnavailable {
            store: "dibi".to_string(),
            reason: "connection refused".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("store 'dibi'"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_serialization_display() {
        let err = EvaluateError::Serialization {
            reason: "invalid JSON".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("serialization error"));
        assert!(msg.contains("invalid JSON"));
    }
}
