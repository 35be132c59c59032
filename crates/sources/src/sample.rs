//! Provider-native samples and their in-memory table.

use std::collections::BTreeMap;

use hmhews_calendar::{DateRange, NaiveDate};
use serde::Serialize;

/// One provider-native value for a region on a day, in the provider's units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawSample {
    region_id: String,
    date: NaiveDate,
    value: f64,
    source: String,
}

impl RawSample {
    pub fn new(
        region_id: impl Into<String>,
        date: NaiveDate,
        value: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            region_id: region_id.into(),
            date,
            value,
            source: source.into(),
        }
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Identifier of the adapter that produced this sample.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Region → day → values, as loaded from a provider extract.
///
/// A day may carry several values (forecast steps). Insertion order within
/// a day is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleTable {
    rows: BTreeMap<String, BTreeMap<NaiveDate, Vec<f64>>>,
    len: usize,
}

impl SampleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value.
    pub fn push(&mut self, region_id: impl Into<String>, date: NaiveDate, value: f64) {
        self.rows
            .entry(region_id.into())
            .or_default()
            .entry(date)
            .or_default()
            .push(value);
        self.len += 1;
    }

    /// Total number of values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Region ids present in the table, ordered.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Days of `region_id` inside `window` with their values, ascending.
    pub fn days_in<'a>(
        &'a self,
        region_id: &str,
        window: &DateRange,
    ) -> impl Iterator<Item = (NaiveDate, &'a [f64])> + use<'a> {
        let range = window.start()..=window.end();
        self.rows
            .get(region_id)
            .into_iter()
            .flat_map(move |days| days.range(range.clone()))
            .map(|(d, v)| (*d, v.as_slice()))
    }

    /// The most recent day recorded for `region_id`.
    pub fn latest(&self, region_id: &str) -> Option<(NaiveDate, &[f64])> {
        self.rows
            .get(region_id)?
            .last_key_value()
            .map(|(d, v)| (*d, v.as_slice()))
    }

    /// Every `(region_id, date, value)` row, ordered by region then day.
    pub fn rows(&self) -> impl Iterator<Item = (&str, NaiveDate, f64)> {
        self.rows.iter().flat_map(|(region, days)| {
            days.iter()
                .flat_map(move |(d, vs)| vs.iter().map(move |v| (region.as_str(), *d, *v)))
        })
    }
}

impl<S: Into<String>> FromIterator<(S, NaiveDate, f64)> for SampleTable {
    fn from_iter<I: IntoIterator<Item = (S, NaiveDate, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (region, date, value) in iter {
            table.push(region, date, value);
        }
        table
    }
}
