//! # hmhews-calendar
//!
//! Daily date arithmetic for backtest windows.
//!
//! ## Quick Start
//!
//! ```
//! use hmhews_calendar::{DateRange, parse_date};
//!
//! let start = parse_date("2024-02-27").unwrap();
//! let end = parse_date("2024-03-01").unwrap();
//! let range = DateRange::new(start, end).unwrap();
//!
//! // Inclusive on both ends, leap day included.
//! assert_eq!(range.len(), 4);
//! assert_eq!(range.iter().last(), Some(end));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `range` | Inclusive `DateRange` and its day iterator |
//! | `parse` | ISO-8601 (`YYYY-MM-DD`) parsing |
//! | `error` | Error types |

mod error;
mod parse;
mod range;

pub use chrono::NaiveDate;
pub use error::CalendarError;
pub use parse::parse_date;
pub use range::{DateRange, Days};
