use std::sync::Arc;

use crate::aggregator::{Aggregator, DEFAULT_WORKERS};
use crate::catalog::{Catalog, Meta, SelectionRequest};
use crate::config::Config;
use crate::domain::{FeedDescriptor, ItemsResponse};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::normalizer::Normalizer;

pub struct AppContext {
    pub catalog: Catalog,
    pub aggregator: Aggregator,
    pub normalizer: Normalizer,
}

impl AppContext {
    pub fn new(config: &Config) -> Self {
        Self::with_workers(config, DEFAULT_WORKERS)
    }

    pub fn with_workers(config: &Config, workers: usize) -> Self {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new());
        Self::with_fetcher(config, fetcher, workers)
    }

    pub fn with_fetcher(
        config: &Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        workers: usize,
    ) -> Self {
        Self {
            catalog: Catalog::new(config),
            aggregator: Aggregator::with_workers(fetcher, workers),
            normalizer: Normalizer::new(),
        }
    }

    /// Select the feeds matching `request`, fetch them all, and return the
    /// merged, time-ordered result.
    ///
    /// Per-feed failures surface only as log entries and missing items; the
    /// call itself always produces a (possibly empty) response.
    pub async fn get_feed_items(&self, request: &SelectionRequest) -> ItemsResponse {
        let feeds: Vec<FeedDescriptor> = self
            .catalog
            .select(request)
            .into_iter()
            .cloned()
            .collect();

        tracing::info!(
            "aggregating {} feeds for sources={:?} topics={:?}",
            feeds.len(),
            request.sources,
            request.topics
        );

        let items = self.aggregator.fetch_all(feeds, &self.normalizer).await;
        ItemsResponse { items }
    }

    pub fn meta(&self) -> &Meta {
        self.catalog.meta()
    }
}
