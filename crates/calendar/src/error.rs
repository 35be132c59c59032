//! Error types for the hmhews-calendar crate.

use chrono::NaiveDate;

/// Error type for all fallible operations in the hmhews-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a range would end before it starts.
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart {
        /// First day of the requested range.
        start: NaiveDate,
        /// Last day of the requested range.
        end: NaiveDate,
    },

    /// Returned when a date string is not a valid `YYYY-MM-DD` date.
    #[error("invalid date '{input}': {reason}")]
    InvalidDate {
        /// The text that failed to parse.
        input: String,
        /// Why parsing failed.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_end_before_start() {
        let err = CalendarError::EndBeforeStart {
            start: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
            end: NaiveDate::from_ymd_opt(2022, 12, 26).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "end date 2022-12-26 is before start date 2022-12-31"
        );
    }

    #[test]
    fn error_invalid_date() {
        let err = CalendarError::InvalidDate {
            input: "2022-13-01".to_string(),
            reason: "input is out of range".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid date '2022-13-01': input is out of range"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CalendarError>();
    }
}
