//! The ground-truth store capability.

use std::collections::BTreeMap;

use hmhews_calendar::DateRange;
use tracing::debug;

use crate::error::StoreError;
use crate::event::DisasterEvent;

/// A source of historical disaster events, keyed by the disaster
/// database's own region ids.
pub trait EventStore: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Confirms the store can be reached before a run starts.
    fn check_available(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Events for `region_id` dated inside `range`, ordered by date.
    fn query(&self, region_id: &str, range: &DateRange) -> Result<Vec<DisasterEvent>, StoreError>;

    /// Source records dropped so far because they could not be turned
    /// into events.
    fn skipped_records(&self) -> u64 {
        0
    }
}

/// Events held in memory, indexed per region and sorted by date.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    name: String,
    by_region: BTreeMap<String, Vec<DisasterEvent>>,
    len: usize,
    skipped: u64,
}

impl InMemoryEventStore {
    pub fn new(name: impl Into<String>, events: Vec<DisasterEvent>) -> Self {
        let len = events.len();
        let mut by_region: BTreeMap<String, Vec<DisasterEvent>> = BTreeMap::new();
        for event in events {
            by_region
                .entry(event.region_id().to_string())
                .or_default()
                .push(event);
        }
        for events in by_region.values_mut() {
            // stable: same-day events keep their load order
            events.sort_by_key(DisasterEvent::date);
        }
        let name = name.into();
        debug!(store = %name, events = len, regions = by_region.len(), "event store indexed");
        Self {
            name,
            by_region,
            len,
            skipped: 0,
        }
    }

    /// Records how many source rows were dropped while loading.
    pub fn with_skipped_records(mut self, skipped: u64) -> Self {
        self.skipped = skipped;
        self
    }

    /// Total number of events held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Region ids with at least one event.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.by_region.keys().map(String::as_str)
    }
}

impl EventStore for InMemoryEventStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self, region_id: &str, range: &DateRange) -> Result<Vec<DisasterEvent>, StoreError> {
        let Some(events) = self.by_region.get(region_id) else {
            return Ok(Vec::new());
        };
        let from = events.partition_point(|e| e.date() < range.start());
        let to = events.partition_point(|e| e.date() <= range.end());
        Ok(events[from..to].to_vec())
    }

    fn skipped_records(&self) -> u64 {
        self.skipped
    }
}
