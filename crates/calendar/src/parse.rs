//! ISO date parsing.

use chrono::NaiveDate;

use crate::error::CalendarError;

/// Parses a `YYYY-MM-DD` date.
///
/// Leading and trailing whitespace is ignored.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDate`] if the text is not a valid
/// calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| CalendarError::InvalidDate {
        input: input.to_string(),
        reason: e.to_string(),
    })
}
