use std::collections::HashMap;
use std::sync::Arc;

use neo_common::{FilterMode, SortKey};
use tracing::debug;

use super::pipeline;
use super::types::NearEarthObject;

/// Filtered and sorted views of one working set, keyed by `(filter, sort)`.
///
/// Entries belong to a single working-set revision and are dropped as soon
/// as a different revision is requested.
#[derive(Debug, Default)]
pub struct ViewCache {
    revision: u64,
    entries: HashMap<(FilterMode, SortKey), Arc<Vec<NearEarthObject>>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        revision: u64,
        objects: &[NearEarthObject],
        filter: FilterMode,
        sort: SortKey,
    ) -> Arc<Vec<NearEarthObject>> {
        if revision != self.revision {
            debug!(
                "Working set revision {} -> {}, dropping {} cached views",
                self.revision,
                revision,
                self.entries.len()
            );
            self.entries.clear();
            self.revision = revision;
        }

        self.entries
            .entry((filter, sort))
            .or_insert_with(|| {
                let filtered = pipeline::filter(objects, filter);
                Arc::new(pipeline::sort(&filtered, sort))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
