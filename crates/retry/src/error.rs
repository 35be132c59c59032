//! Retry policy errors.

/// Errors raised when a retry policy is misconfigured.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RetryError {
    /// The policy has an out-of-range parameter.
    #[error("invalid retry policy: {reason}")]
    InvalidPolicy { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_policy_display() {
        let err = RetryError::InvalidPolicy {
            reason: "max_attempts must be >= 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid retry policy: max_attempts must be >= 1"
        );
    }
}
