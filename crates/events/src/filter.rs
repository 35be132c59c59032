//! Which events count as ground-truth positives.

use std::collections::BTreeSet;

use hmhews_calendar::NaiveDate;

use crate::event::{DisasterEvent, EventType};

/// Qualifying criteria for ground-truth events.
///
/// The default accepts floods of any size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    event_types: Vec<EventType>,
    min_affected: Option<u64>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            event_types: vec![EventType::Flood],
            min_affected: None,
        }
    }
}

impl EventFilter {
    /// A filter accepting every event type.
    pub fn any() -> Self {
        Self {
            event_types: Vec::new(),
            min_affected: None,
        }
    }

    /// Restricts accepted types. An empty list accepts every type.
    pub fn with_event_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = types;
        self
    }

    /// Requires at least `n` people affected. Events without reported
    /// severity never pass a minimum.
    pub fn with_min_affected(mut self, n: Option<u64>) -> Self {
        self.min_affected = n;
        self
    }

    pub fn event_types(&self) -> &[EventType] {
        &self.event_types
    }

    pub fn min_affected(&self) -> Option<u64> {
        self.min_affected
    }

    /// Returns true if `event` counts as ground truth.
    pub fn qualifies(&self, event: &DisasterEvent) -> bool {
        let type_ok = self.event_types.is_empty() || self.event_types.contains(event.event_type());
        let size_ok = match self.min_affected {
            None => true,
            Some(min) => event
                .severity()
                .is_some_and(|s| s.victims.affected() >= min),
        };
        type_ok && size_ok
    }
}

/// Dates holding at least one qualifying event.
pub fn positive_dates(events: &[DisasterEvent], filter: &EventFilter) -> BTreeSet<NaiveDate> {
    events
        .iter()
        .filter(|e| filter.qualifies(e))
        .map(DisasterEvent::date)
        .collect()
}
