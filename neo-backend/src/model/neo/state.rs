///! Dashboard state as an immutable snapshot plus a pure reducer
///!
///! Every request bumps a generation counter. Responses carry the generation
///! they were issued under and are dropped when a newer request exists.
use std::sync::Arc;

use neo_common::{DateRange, FilterMode, SortKey};
use serde::Serialize;

use super::error::{NeoError, RATE_LIMIT_HINT};
use super::pipeline;
use super::types::{NearEarthObject, NeoStats};

/// User-selected parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewParams {
    pub date_range: DateRange,
    pub filter: FilterMode,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub params: ViewParams,
    /// Full flattened feed, before filtering
    pub objects: Arc<Vec<NearEarthObject>>,
    /// Bumped whenever `objects` is replaced
    pub revision: u64,
    pub lookup: Option<NearEarthObject>,
    pub error: Option<String>,
    pub feed_generation: u64,
    pub lookup_generation: u64,
    pub feed_pending: bool,
    pub lookup_pending: bool,
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    FeedRequested { date_range: DateRange },
    FeedLoaded { generation: u64, objects: Vec<NearEarthObject> },
    FeedFailed { generation: u64, error: NeoError },
    LookupRequested,
    LookupLoaded { generation: u64, object: NearEarthObject },
    LookupFailed { generation: u64, error: NeoError },
    FilterChanged(FilterMode),
    SortChanged(SortKey),
}

impl DashboardSnapshot {
    pub fn new(params: ViewParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn loading(&self) -> bool {
        self.feed_pending || self.lookup_pending
    }

    /// Current error with the rate-limit hint appended
    pub fn display_error(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| format!("Error: {}\n{}", e, RATE_LIMIT_HINT))
    }

    /// Compute the display view without caching
    pub fn view(&self) -> DashboardView {
        let filtered = pipeline::filter(&self.objects, self.params.filter);
        DashboardView::build(self, pipeline::sort(&filtered, self.params.sort))
    }
}

/// Whether a response belongs to the latest request on its channel
fn is_current(latest: u64, generation: u64) -> bool {
    latest == generation
}

/// Apply one event, returning the next snapshot.
pub fn reduce(snapshot: &DashboardSnapshot, event: DashboardEvent) -> DashboardSnapshot {
    let mut next = snapshot.clone();

    match event {
        DashboardEvent::FeedRequested { date_range } => {
            next.params.date_range = date_range;
            next.feed_generation += 1;
            // An outstanding lookup would repopulate the cleared result
            next.lookup_generation += 1;
            next.feed_pending = true;
            next.lookup_pending = false;
            next.error = None;
            next.lookup = None;
        }
        DashboardEvent::FeedLoaded { generation, objects } => {
            if !is_current(snapshot.feed_generation, generation) {
                return next;
            }
            next.objects = Arc::new(objects);
            next.revision += 1;
            next.feed_pending = false;
        }
        DashboardEvent::FeedFailed { generation, error } => {
            if !is_current(snapshot.feed_generation, generation) {
                return next;
            }
            next.objects = Arc::new(Vec::new());
            next.revision += 1;
            next.feed_pending = false;
            next.error = Some(error.to_string());
        }
        DashboardEvent::LookupRequested => {
            next.lookup_generation += 1;
            next.lookup_pending = true;
            next.error = None;
            next.lookup = None;
        }
        DashboardEvent::LookupLoaded { generation, object } => {
            if !is_current(snapshot.lookup_generation, generation) {
                return next;
            }
            next.lookup = Some(object);
            next.lookup_pending = false;
        }
        DashboardEvent::LookupFailed { generation, error } => {
            if !is_current(snapshot.lookup_generation, generation) {
                return next;
            }
            next.lookup = None;
            next.lookup_pending = false;
            next.error = Some(error.to_string());
        }
        DashboardEvent::FilterChanged(mode) => next.params.filter = mode,
        DashboardEvent::SortChanged(key) => next.params.sort = key,
    }

    next
}

/// Everything a presentation layer needs for one render
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub params: ViewParams,
    /// Filtered and sorted working set
    pub objects: Vec<NearEarthObject>,
    /// Closest object within `objects`
    pub closest: Option<NearEarthObject>,
    /// Computed over the unfiltered feed
    pub stats: NeoStats,
    pub lookup: Option<NearEarthObject>,
    pub error: Option<String>,
    pub loading: bool,
}

impl DashboardView {
    pub(crate) fn build(snapshot: &DashboardSnapshot, objects: Vec<NearEarthObject>) -> Self {
        let closest = pipeline::closest(&objects).cloned();
        Self {
            params: snapshot.params,
            closest,
            stats: pipeline::stats(&snapshot.objects),
            objects,
            lookup: snapshot.lookup.clone(),
            error: snapshot.display_error(),
            loading: snapshot.loading(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::neo::types::sample_neo;

    fn loaded(objects: Vec<NearEarthObject>) -> DashboardSnapshot {
        let s = reduce(
            &DashboardSnapshot::default(),
            DashboardEvent::FeedRequested { date_range: DateRange::Today },
        );
        let generation = s.feed_generation;
        reduce(&s, DashboardEvent::FeedLoaded { generation, objects })
    }

    fn two_objects() -> Vec<NearEarthObject> {
        vec![
            sample_neo("A", true, 50_000.0, 10.0, 0.3, "2024-01-15 10:00"),
            sample_neo("B", false, 20_000.0, 12.0, 0.2, "2024-01-16 10:00"),
        ]
    }

    #[test]
    fn test_feed_loaded_replaces_working_set() {
        let s = loaded(two_objects());
        assert_eq!(s.objects.len(), 2);
        assert_eq!(s.revision, 1);
        assert!(!s.loading());
        assert!(s.error.is_none());
    }

    #[test]
    fn test_feed_failure_clears_working_set() {
        let s = loaded(two_objects());
        let s = reduce(&s, DashboardEvent::FeedRequested { date_range: DateRange::Week });
        let generation = s.feed_generation;
        let s = reduce(
            &s,
            DashboardEvent::FeedFailed {
                generation,
                error: NeoError::Ingestion("Failed to fetch data".into()),
            },
        );
        assert!(s.objects.is_empty());
        assert_eq!(s.params.date_range, DateRange::Week);
        assert_eq!(s.error.as_deref(), Some("Failed to fetch data"));
        let shown = s.display_error().unwrap();
        assert!(shown.contains("Failed to fetch data"));
        assert!(shown.ends_with(RATE_LIMIT_HINT));
    }

    #[test]
    fn test_stale_feed_response_is_discarded() {
        let s = DashboardSnapshot::default();
        let s = reduce(&s, DashboardEvent::FeedRequested { date_range: DateRange::Week });
        let old = s.feed_generation;
        let s = reduce(&s, DashboardEvent::FeedRequested { date_range: DateRange::Today });
        let new = s.feed_generation;

        let s = reduce(&s, DashboardEvent::FeedLoaded { generation: new, objects: two_objects() });
        let s = reduce(&s, DashboardEvent::FeedLoaded { generation: old, objects: vec![] });
        assert_eq!(s.objects.len(), 2);

        let s = reduce(
            &s,
            DashboardEvent::FeedFailed { generation: old, error: NeoError::Ingestion("late".into()) },
        );
        assert_eq!(s.objects.len(), 2);
        assert!(s.error.is_none());
    }

    #[test]
    fn test_lookup_failure_clears_previous_result() {
        let s = loaded(two_objects());
        let s = reduce(&s, DashboardEvent::LookupRequested);
        let generation = s.lookup_generation;
        let s = reduce(&s, DashboardEvent::LookupLoaded { generation, object: two_objects().remove(0) });
        assert_eq!(s.lookup.as_ref().map(|o| o.id.as_str()), Some("A"));

        let s = reduce(&s, DashboardEvent::LookupRequested);
        assert!(s.lookup.is_none());
        let generation = s.lookup_generation;
        let s = reduce(
            &s,
            DashboardEvent::LookupFailed {
                generation,
                error: NeoError::Lookup("Asteroid not found: 42".into()),
            },
        );
        assert!(s.lookup.is_none());
        assert_eq!(s.error.as_deref(), Some("Asteroid not found: 42"));
        // Lookup never touches the working set
        assert_eq!(s.objects.len(), 2);
    }

    #[test]
    fn test_new_request_clears_error_and_lookup() {
        let s = loaded(two_objects());
        let s = reduce(&s, DashboardEvent::LookupRequested);
        let generation = s.lookup_generation;
        let s = reduce(&s, DashboardEvent::LookupLoaded { generation, object: two_objects().remove(1) });
        let s = DashboardSnapshot { error: Some("old".into()), ..s };

        let s = reduce(&s, DashboardEvent::FeedRequested { date_range: DateRange::Today });
        assert!(s.error.is_none());
        assert!(s.lookup.is_none());
        assert!(s.feed_pending);
    }

    #[test]
    fn test_lookup_in_flight_during_feed_request_is_dropped() {
        let s = loaded(two_objects());
        let s = reduce(&s, DashboardEvent::LookupRequested);
        let lookup_generation = s.lookup_generation;
        let s = reduce(&s, DashboardEvent::FeedRequested { date_range: DateRange::Today });
        let s = reduce(
            &s,
            DashboardEvent::LookupLoaded { generation: lookup_generation, object: two_objects().remove(0) },
        );
        assert!(s.lookup.is_none());
    }

    #[test]
    fn test_lookup_does_not_invalidate_feed() {
        let s = DashboardSnapshot::default();
        let s = reduce(&s, DashboardEvent::FeedRequested { date_range: DateRange::Today });
        let generation = s.feed_generation;
        let s = reduce(&s, DashboardEvent::LookupRequested);
        let s = reduce(&s, DashboardEvent::FeedLoaded { generation, objects: two_objects() });
        assert_eq!(s.objects.len(), 2);
        assert!(s.lookup_pending);
        assert!(s.loading());
    }

    #[test]
    fn test_view_filters_sorts_and_summarizes() {
        let s = loaded(two_objects());
        let s = reduce(&s, DashboardEvent::FilterChanged(FilterMode::HazardousOnly));
        let s = reduce(&s, DashboardEvent::SortChanged(SortKey::Distance));

        let view = s.view();
        assert_eq!(view.objects.len(), 1);
        assert_eq!(view.closest.as_ref().map(|o| o.id.as_str()), Some("A"));
        // Stats cover the whole feed, not the filtered set
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.stats.closest_distance_thousand_km, 20);
        assert!(view.error.is_none());
    }

    #[test]
    fn test_empty_feed_view() {
        let view = loaded(vec![]).view();
        assert!(view.objects.is_empty());
        assert!(view.closest.is_none());
        assert_eq!(view.stats, NeoStats::default());
    }
}
