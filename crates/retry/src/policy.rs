//! Retry policy and the retry loop.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::RetryError;

/// Classifies an error as worth retrying or not.
pub trait Transient {
    /// Returns true when the failure may clear up on its own (network
    /// outage, upstream timeout).
    fn is_transient(&self) -> bool;
}

/// Bounded exponential backoff.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hmhews_retry::RetryPolicy;
///
/// let policy = RetryPolicy::new(4)
///     .with_initial_backoff(Duration::from_millis(100))
///     .with_multiplier(2.0)
///     .with_max_backoff(Duration::from_millis(250));
/// assert!(policy.validate().is_ok());
/// assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
/// assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
/// assert_eq!(policy.backoff_for(3), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    multiplier: f64,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    /// Three attempts, 500 ms initial backoff doubling up to 10 s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` calls in total.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// A policy that calls the operation exactly once.
    pub fn no_retry() -> Self {
        Self::new(1).with_initial_backoff(Duration::ZERO)
    }

    /// Sets the delay before the first retry.
    pub fn with_initial_backoff(mut self, d: Duration) -> Self {
        self.initial_backoff = d;
        self
    }

    /// Sets the growth factor applied after each failed attempt.
    pub fn with_multiplier(mut self, m: f64) -> Self {
        self.multiplier = m;
        self
    }

    /// Sets the ceiling on any single delay.
    pub fn with_max_backoff(mut self, d: Duration) -> Self {
        self.max_backoff = d;
        self
    }

    /// Returns the total number of attempts allowed.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay before the first retry.
    pub fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Returns the backoff growth factor.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Returns the delay ceiling.
    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// `initial * multiplier^(attempt - 1)`, capped at `max_backoff`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exp);
        let cap = self.max_backoff.as_secs_f64();
        if !secs.is_finite() || secs >= cap {
            self.max_backoff
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// Validates this policy.
    pub fn validate(&self) -> Result<(), RetryError> {
        if self.max_attempts == 0 {
            return Err(RetryError::InvalidPolicy {
                reason: "max_attempts must be >= 1".to_string(),
            });
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(RetryError::InvalidPolicy {
                reason: format!("multiplier must be finite and >= 1, got {}", self.multiplier),
            });
        }
        if self.max_backoff < self.initial_backoff {
            return Err(RetryError::InvalidPolicy {
                reason: format!(
                    "max_backoff ({:?}) must be >= initial_backoff ({:?})",
                    self.max_backoff, self.initial_backoff
                ),
            });
        }
        Ok(())
    }
}

/// Runs `op` until it succeeds, fails permanently, or the attempt budget
/// is spent. The last error is returned on exhaustion.
pub fn retry<T, E, F>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Result<T, E>,
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) if attempt >= max => {
                warn!(operation = label, attempts = attempt, error = %e, "retry budget exhausted");
                return Err(e);
            }
            Err(e) => {
                let delay = policy.backoff_for(attempt);
                warn!(
                    operation = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient failure, retrying"
                );
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                attempt += 1;
                debug!(operation = label, attempt, "retry attempt");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Down,
        Broken,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    impl Transient for TestError {
        fn is_transient(&self) -> bool {
            matches!(self, TestError::Down)
        }
    }

    fn instant(max: u32) -> RetryPolicy {
        RetryPolicy::new(max).with_initial_backoff(Duration::ZERO)
    }

    #[test]
    fn test_default_validates() {
        assert!(RetryPolicy::default().validate().is_ok());
        assert!(RetryPolicy::no_retry().validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(RetryPolicy::new(0).validate().is_err());
    }

    #[test]
    fn test_shrinking_multiplier_rejected() {
        assert!(RetryPolicy::default().with_multiplier(0.5).validate().is_err());
        assert!(RetryPolicy::default().with_multiplier(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_cap_below_initial_rejected() {
        let p = RetryPolicy::default()
            .with_initial_backoff(Duration::from_secs(5))
            .with_max_backoff(Duration::from_secs(1));
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_backoff_schedule_is_capped() {
        let p = RetryPolicy::new(10)
            .with_initial_backoff(Duration::from_millis(10))
            .with_multiplier(3.0)
            .with_max_backoff(Duration::from_millis(100));
        assert_eq!(p.backoff_for(1), Duration::from_millis(10));
        assert_eq!(p.backoff_for(2), Duration::from_millis(30));
        assert_eq!(p.backoff_for(3), Duration::from_millis(90));
        assert_eq!(p.backoff_for(4), Duration::from_millis(100));
        assert_eq!(p.backoff_for(60), Duration::from_millis(100));
    }

    #[test]
    fn test_success_first_try() {
        let mut calls = 0;
        let out: Result<i32, TestError> = retry(&instant(3), "op", || {
            calls += 1;
            Ok(1)
        });
        assert_eq!(out, Ok(1));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_transient_exhausts_budget() {
        let mut calls = 0;
        let out: Result<i32, TestError> = retry(&instant(4), "op", || {
            calls += 1;
            Err(TestError::Down)
        });
        assert_eq!(out, Err(TestError::Down));
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_permanent_not_retried() {
        let mut calls = 0;
        let out: Result<i32, TestError> = retry(&instant(5), "op", || {
            calls += 1;
            Err(TestError::Broken)
        });
        assert_eq!(out, Err(TestError::Broken));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_recovers_after_outage() {
        let mut calls = 0;
        let out: Result<&str, TestError> = retry(&instant(3), "op", || {
            calls += 1;
            if calls == 1 { Err(TestError::Down) } else { Ok("up") }
        });
        assert_eq!(out, Ok("up"));
        assert_eq!(calls, 2);
    }
}
