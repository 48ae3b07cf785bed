pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;

/// Retrieves the raw body of a feed URL.
///
/// Every call is a fresh, unconditional fetch; there is no cross-request
/// cache to revalidate against. The trait seam exists so the aggregator can
/// be exercised against in-memory fetchers in tests.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
