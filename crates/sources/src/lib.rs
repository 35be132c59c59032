//! # hmhews-sources
//!
//! The Hazard Source Adapter layer: one [`HazardSource`] per upstream
//! provider, each returning provider-native [`RawSample`]s for a region and
//! a date window. Unit and scale normalization happens later, in the index
//! engine.
//!
//! An adapter distinguishes "no data for this window" (an empty vector)
//! from "the provider could not be reached" ([`SourceError::Unavailable`]).
//! The latter is [`Transient`](hmhews_retry::Transient) and gets retried.
//!
//! ## Quick Start
//!
//! ```
//! use hmhews_calendar::{DateRange, NaiveDate};
//! use hmhews_sources::{HazardSource, SampleTable, SatellitePrecipitation};
//!
//! let day = NaiveDate::from_ymd_opt(2022, 12, 26).unwrap();
//! let mut table = SampleTable::new();
//! table.push("IDN.9.1_1", day, 42.5);
//! table.push("IDN.9.1_1", day, -9999.0); // provider no-data sentinel
//!
//! let chirps = SatellitePrecipitation::new("chirps", table);
//! let samples = chirps.fetch("IDN.9.1_1", &DateRange::single(day)).unwrap();
//! assert_eq!(samples.len(), 1);
//! assert_eq!(samples[0].value(), 42.5);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `adapter` | The `HazardSource` trait and the three provider variants |
//! | `kind` | `SourceKind` |
//! | `registry` | Identifier to adapter lookup |
//! | `sample` | `RawSample` and the in-memory `SampleTable` |
//! | `error` | Error types |

mod adapter;
mod error;
mod kind;
mod registry;
mod sample;

pub use adapter::{ForecastPrecipitation, HazardSource, RiskIndex, SatellitePrecipitation};
pub use error::SourceError;
pub use kind::SourceKind;
pub use registry::SourceRegistry;
pub use sample::{RawSample, SampleTable};
