//! # hmhews-events
//!
//! Historical disaster records used as ground truth.
//!
//! A day is *positive* for a region when at least one qualifying
//! [`DisasterEvent`] exists for it on that date. What qualifies is decided
//! by an [`EventFilter`] (event types, minimum number of people affected).
//! Stores are queried in the disaster database's own region ids; the
//! identity layer in `hmhews-regions` translates boundary ids first.
//!
//! Two stores ship: [`InMemoryEventStore`] over a DIBI export file and
//! [`DibiHttpStore`], which queries the live `get_dibi3x` endpoint.
//!
//! ## Quick Start
//!
//! ```
//! use hmhews_calendar::{DateRange, NaiveDate};
//! use hmhews_events::{DisasterEvent, EventFilter, EventStore, EventType, InMemoryEventStore, positive_dates};
//!
//! let day = NaiveDate::from_ymd_opt(2022, 12, 26).unwrap();
//! let store = InMemoryEventStore::new("dibi", vec![
//!     DisasterEvent::new("1", "3204", day, EventType::Flood),
//!     DisasterEvent::new("2", "3204", day, EventType::Other("102".into())),
//! ]);
//!
//! let events = store.query("3204", &DateRange::single(day)).unwrap();
//! assert_eq!(events.len(), 2);
//! assert!(positive_dates(&events, &EventFilter::default()).contains(&day));
//! ```

mod error;
mod event;
mod filter;
mod http;
mod store;

pub mod dibi;

pub use error::{EventError, StoreError};
pub use event::{DisasterEvent, EventType, HouseDamage, Severity, Victims};
pub use filter::{EventFilter, positive_dates};
pub use http::{DIBI_URL, DibiHttpConfig, DibiHttpStore};
pub use store::{EventStore, InMemoryEventStore};
