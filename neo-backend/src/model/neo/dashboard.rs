use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use neo_common::{DateRange, FilterMode, SortKey};

use super::api_client::NeoSource;
use super::cache::ViewCache;
use super::error::NeoError;
use super::pipeline;
use super::state::{reduce, DashboardEvent, DashboardSnapshot, DashboardView, ViewParams};
use super::types::NearEarthObject;

/// Owns the data source and the current snapshot; all state changes go
/// through [`reduce`].
pub struct NeoDashboard<S: NeoSource> {
    source: S,
    snapshot: Arc<RwLock<DashboardSnapshot>>,
    cache: Mutex<ViewCache>,
}

impl<S: NeoSource> NeoDashboard<S> {
    pub fn new(source: S, params: ViewParams) -> Self {
        Self {
            source,
            snapshot: Arc::new(RwLock::new(DashboardSnapshot::new(params))),
            cache: Mutex::new(ViewCache::new()),
        }
    }

    /// Shared handle to the current snapshot, for read-only access
    pub fn snapshot_handle(&self) -> Arc<RwLock<DashboardSnapshot>> {
        self.snapshot.clone()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    async fn dispatch(&self, event: DashboardEvent) -> DashboardSnapshot {
        let mut current = self.snapshot.write().await;
        let next = reduce(&current, event);
        *current = next.clone();
        next
    }

    /// Re-ingest the feed for the current date range.
    ///
    /// Returns the number of ingested objects. On failure the working set is
    /// emptied and the error is recorded in the snapshot as well.
    pub async fn refresh(&self, today: NaiveDate) -> Result<usize, NeoError> {
        let date_range = self.snapshot.read().await.params.date_range;
        self.ingest(date_range, today).await
    }

    pub async fn set_date_range(&self, date_range: DateRange, today: NaiveDate) -> Result<usize, NeoError> {
        self.ingest(date_range, today).await
    }

    async fn ingest(&self, date_range: DateRange, today: NaiveDate) -> Result<usize, NeoError> {
        let generation = self
            .dispatch(DashboardEvent::FeedRequested { date_range })
            .await
            .feed_generation;
        let (start, end) = date_range.window(today);

        info!(
            "Fetching NEO feed ({}) {} .. {} from {} [generation {}]",
            date_range,
            start,
            end,
            self.source.source_name(),
            generation
        );

        match self.source.fetch_feed(start, end).await {
            Ok(feed) => {
                let dates = feed.groups.len();
                let objects = pipeline::flatten(feed);
                let count = objects.len();
                let next = self
                    .dispatch(DashboardEvent::FeedLoaded { generation, objects })
                    .await;
                if next.feed_generation != generation {
                    debug!("Discarded stale feed response [generation {}]", generation);
                } else {
                    info!("Ingested {} objects across {} dates", count, dates);
                }
                Ok(count)
            }
            Err(e) => {
                warn!("Feed ingestion failed: {}", e);
                self.dispatch(DashboardEvent::FeedFailed { generation, error: e.clone() })
                    .await;
                Err(e)
            }
        }
    }

    /// Look up one object by identifier.
    ///
    /// Blank input is a no-op and returns `Ok(None)`.
    pub async fn search(&self, id: &str) -> Result<Option<NearEarthObject>, NeoError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let generation = self
            .dispatch(DashboardEvent::LookupRequested)
            .await
            .lookup_generation;

        info!("Looking up asteroid {} [generation {}]", id, generation);

        match self.source.lookup(id).await {
            Ok(object) => {
                let next = self
                    .dispatch(DashboardEvent::LookupLoaded { generation, object: object.clone() })
                    .await;
                if next.lookup_generation != generation {
                    debug!("Discarded stale lookup response for {}", id);
                }
                Ok(Some(object))
            }
            Err(e) => {
                warn!("Lookup of {} failed: {}", id, e);
                self.dispatch(DashboardEvent::LookupFailed { generation, error: e.clone() })
                    .await;
                Err(e)
            }
        }
    }

    pub async fn set_filter(&self, mode: FilterMode) {
        self.dispatch(DashboardEvent::FilterChanged(mode)).await;
    }

    pub async fn set_sort(&self, key: SortKey) {
        self.dispatch(DashboardEvent::SortChanged(key)).await;
    }

    /// Current display view, reusing cached filter/sort results
    pub async fn view(&self) -> DashboardView {
        let snapshot = self.snapshot().await;
        let objects = self.cache.lock().await.get_or_compute(
            snapshot.revision,
            &snapshot.objects,
            snapshot.params.filter,
            snapshot.params.sort,
        );
        DashboardView::build(&snapshot, objects.as_ref().clone())
    }
}
