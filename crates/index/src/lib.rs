//! Hazard index composition for the hmhews flood backtester.
//!
//! The engine turns the raw, provider-native samples of one or more
//! [`HazardSource`](hmhews_sources::HazardSource)s into a single hazard
//! value in `[0, 1]` per region and day, and a [`Threshold`] turns that
//! value into a yes/no flood prediction.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────┐   ┌─────────────┐   ┌───────────┐   ┌─────────────┐
//!  │  fetch   │──▶│ aggregate   │──▶│ normalize │──▶│ compose     │──▶ CellOutcome
//!  │ (retry)  │   │ per day     │   │ (Scale)   │   │ (rule)      │
//!  └──────────┘   └─────────────┘   └───────────┘   └─────────────┘
//! ```
//!
//! # Composition
//!
//! [`CompositionRule::WeightedMean`] (default) averages the normalized
//! components of the sources that have data, renormalizing the weights
//! over those sources. [`CompositionRule::Precedence`] takes the first
//! source in configured order that has data. Either way a `required`
//! source without data makes the cell no-data.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use hmhews_calendar::NaiveDate;
//! use hmhews_index::{HazardIndexEngine, IndexConfig, Scale, SourceSpec};
//! use hmhews_retry::RetryPolicy;
//! use hmhews_sources::{SampleTable, SatellitePrecipitation, SourceKind, SourceRegistry};
//!
//! let day = NaiveDate::from_ymd_opt(2022, 12, 26).unwrap();
//! let table: SampleTable = [("IDN.9.1_1", day, 25.0)].into_iter().collect();
//! let mut registry = SourceRegistry::new();
//! registry.register(Arc::new(SatellitePrecipitation::new("chirps", table)));
//!
//! let config = IndexConfig::new().with_source(
//!     SourceSpec::new("chirps", SourceKind::HistoricalSatellite)
//!         .with_scale(Scale::new(0.0, 50.0).unwrap()),
//! );
//! let engine = HazardIndexEngine::new(config, &registry, RetryPolicy::no_retry()).unwrap();
//! let sample = engine.compute("IDN.9.1_1", day).sample().cloned().unwrap();
//! assert_eq!(sample.value(), 0.5);
//! ```

mod aggregate;
mod config;
mod engine;
mod error;
mod scale;

pub use aggregate::Aggregation;
pub use config::{CompositionRule, IndexConfig, SourceSpec};
pub use engine::{CellOutcome, HazardIndexEngine, HazardSample};
pub use error::IndexError;
pub use scale::{Scale, Threshold};
