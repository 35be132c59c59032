//! Identifier → adapter lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::adapter::HazardSource;
use crate::error::SourceError;

/// The set of hazard sources available to a run.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    adapters: BTreeMap<String, Arc<dyn HazardSource>>,
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter under its identifier. A second adapter with the
    /// same identifier replaces the first.
    pub fn register(&mut self, adapter: Arc<dyn HazardSource>) {
        let id = adapter.identifier().to_string();
        debug!(source = %id, kind = %adapter.kind(), "registering hazard source");
        if self.adapters.insert(id.clone(), adapter).is_some() {
            warn!(source = %id, "hazard source registered twice; keeping the newer adapter");
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Arc<dyn HazardSource>> {
        self.adapters.get(identifier)
    }

    /// Registered identifiers, ordered.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Looks up `identifiers` in the given order.
    pub fn resolve<S: AsRef<str>>(
        &self,
        identifiers: &[S],
    ) -> Result<Vec<Arc<dyn HazardSource>>, SourceError> {
        identifiers
            .iter()
            .map(|id| {
                let id = id.as_ref();
                self.adapters
                    .get(id)
                    .cloned()
                    .ok_or_else(|| SourceError::UnknownSource {
                        source_id: id.to_string(),
                    })
            })
            .collect()
    }
}
