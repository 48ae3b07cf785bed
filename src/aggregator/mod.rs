//! Concurrent fan-out over selected feeds.
//!
//! Every selected feed is fetched in its own task, gated by a semaphore so
//! at most [`DEFAULT_WORKERS`] fetches are in flight. Each task fills a
//! private item buffer; the buffers are concatenated in selection order
//! after the join and the merged collection is sorted by publication time.
//! A feed that fails or exceeds its deadline contributes zero items and
//! never fails the call.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::app::Result;
use crate::domain::{FeedDescriptor, FeedItem};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

pub struct Aggregator {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
    fetch_timeout: Duration,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers)),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Override the per-feed deadline.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Fetch every descriptor concurrently and merge the results into a
    /// single collection, ascending by publication time.
    ///
    /// Items with no publication time sort after all timestamped items.
    /// Ties keep the deterministic selection order: tasks are joined in
    /// spawn order, so the pre-sort concatenation never depends on which
    /// fetch finished first, and the sort is stable.
    pub async fn fetch_all(
        &self,
        feeds: Vec<FeedDescriptor>,
        normalizer: &Normalizer,
    ) -> Vec<FeedItem> {
        let mut handles = Vec::with_capacity(feeds.len());

        for feed in feeds {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let normalizer = normalizer.clone();
            let deadline = self.fetch_timeout;

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("Semaphore closed");

                match tokio::time::timeout(
                    deadline,
                    fetch_single_feed(&fetcher, &feed, &normalizer),
                )
                .await
                {
                    Ok(Ok(items)) => {
                        tracing::debug!("{} items from {}", items.len(), feed.url);
                        items
                    }
                    Ok(Err(e)) => {
                        tracing::warn!("error retrieving {}: {}", feed.url, e);
                        Vec::new()
                    }
                    Err(_) => {
                        tracing::warn!("timed out retrieving {} after {:?}", feed.url, deadline);
                        Vec::new()
                    }
                }
            });

            handles.push(handle);
        }

        let mut items = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(batch) => items.extend(batch),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        sort_by_published(&mut items);
        items
    }
}

async fn fetch_single_feed(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    feed: &FeedDescriptor,
    normalizer: &Normalizer,
) -> Result<Vec<FeedItem>> {
    let body = fetcher.fetch(&feed.url).await?;
    normalizer.normalize(feed, &body)
}

/// Stable sort ascending by publication time, untimestamped items last.
fn sort_by_published(items: &mut [FeedItem]) {
    items.sort_by(|a, b| match (&a.published, &b.published) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EstuaryError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fmt::Write;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// In-memory fetcher serving canned bodies; unknown URLs fail like an
    /// unreachable host.
    struct StaticFetcher {
        bodies: HashMap<String, String>,
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(bodies: Vec<(&str, String)>) -> Self {
            Self {
                bodies: bodies
                    .into_iter()
                    .map(|(url, body)| (url.to_string(), body))
                    .collect(),
                delay: Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            let now = self.in_flight.fetch_add(1, AtomicOrdering::SeqCst) + 1;
            self.max_in_flight
                .fetch_max(now, AtomicOrdering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, AtomicOrdering::SeqCst);

            self.bodies
                .get(url)
                .map(|body| body.as_bytes().to_vec())
                .ok_or_else(|| {
                    EstuaryError::Io(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        format!("unreachable feed: {url}"),
                    ))
                })
        }
    }

    /// A fetcher that never resolves, standing in for an unresponsive host.
    struct HangingFetcher;

    #[async_trait]
    impl Fetcher for HangingFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            std::future::pending().await
        }
    }

    fn rss_body(items: &[(&str, Option<&str>)]) -> String {
        let mut body = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>t</title>"#,
        );
        for (title, pub_date) in items {
            write!(body, "<item><title>{title}</title><guid>{title}</guid>").unwrap();
            if let Some(date) = pub_date {
                write!(body, "<pubDate>{date}</pubDate>").unwrap();
            }
            body.push_str("</item>");
        }
        body.push_str("</channel></rss>");
        body
    }

    fn descriptor(source: &str, topic: &str, url: &str) -> FeedDescriptor {
        FeedDescriptor::new(source, topic, url)
    }

    fn titles(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_merge_is_ordered_by_published() {
        let fetcher = StaticFetcher::new(vec![
            (
                "https://a.example/feed",
                rss_body(&[
                    ("a-early", Some("Mon, 01 Jan 2024 10:00:00 GMT")),
                    ("a-late", Some("Mon, 01 Jan 2024 12:00:00 GMT")),
                ]),
            ),
            (
                "https://b.example/feed",
                rss_body(&[("b-mid", Some("Mon, 01 Jan 2024 11:00:00 GMT"))]),
            ),
        ]);
        let aggregator = Aggregator::new(Arc::new(fetcher));

        let items = aggregator
            .fetch_all(
                vec![
                    descriptor("a", "uk", "https://a.example/feed"),
                    descriptor("b", "uk", "https://b.example/feed"),
                ],
                &Normalizer::new(),
            )
            .await;

        assert_eq!(titles(&items), vec!["a-early", "b-mid", "a-late"]);
        for pair in items.windows(2) {
            assert!(pair[0].published <= pair[1].published);
        }
    }

    #[tokio::test]
    async fn test_failed_feed_is_isolated() {
        let fetcher = StaticFetcher::new(vec![
            (
                "https://a.example/feed",
                rss_body(&[("a-1", Some("Mon, 01 Jan 2024 10:00:00 GMT"))]),
            ),
            (
                "https://c.example/feed",
                rss_body(&[("c-1", Some("Mon, 01 Jan 2024 09:00:00 GMT"))]),
            ),
        ]);
        let aggregator = Aggregator::new(Arc::new(fetcher));

        // b.example is not served and fails with a connection error.
        let items = aggregator
            .fetch_all(
                vec![
                    descriptor("a", "uk", "https://a.example/feed"),
                    descriptor("b", "uk", "https://b.example/feed"),
                    descriptor("c", "uk", "https://c.example/feed"),
                ],
                &Normalizer::new(),
            )
            .await;

        assert_eq!(titles(&items), vec!["c-1", "a-1"]);
    }

    #[tokio::test]
    async fn test_malformed_feed_is_isolated() {
        let fetcher = StaticFetcher::new(vec![
            ("https://a.example/feed", "not xml at all".to_string()),
            (
                "https://b.example/feed",
                rss_body(&[("b-1", Some("Mon, 01 Jan 2024 09:00:00 GMT"))]),
            ),
        ]);
        let aggregator = Aggregator::new(Arc::new(fetcher));

        let items = aggregator
            .fetch_all(
                vec![
                    descriptor("a", "uk", "https://a.example/feed"),
                    descriptor("b", "uk", "https://b.example/feed"),
                ],
                &Normalizer::new(),
            )
            .await;

        assert_eq!(titles(&items), vec!["b-1"]);
    }

    #[tokio::test]
    async fn test_untimestamped_items_sort_last() {
        let fetcher = StaticFetcher::new(vec![(
            "https://a.example/feed",
            rss_body(&[
                ("undated", None),
                ("dated", Some("Mon, 01 Jan 2024 10:00:00 GMT")),
            ]),
        )]);
        let aggregator = Aggregator::new(Arc::new(fetcher));

        let items = aggregator
            .fetch_all(
                vec![descriptor("a", "uk", "https://a.example/feed")],
                &Normalizer::new(),
            )
            .await;

        assert_eq!(titles(&items), vec!["dated", "undated"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_selection_order() {
        let same = Some("Mon, 01 Jan 2024 10:00:00 GMT");
        let bodies = vec![
            ("https://a.example/feed", rss_body(&[("a-1", same)])),
            ("https://b.example/feed", rss_body(&[("b-1", same)])),
        ];
        let feeds = vec![
            descriptor("a", "uk", "https://a.example/feed"),
            descriptor("b", "uk", "https://b.example/feed"),
        ];

        // Delay makes completion order racy; output order must not be.
        for _ in 0..3 {
            let fetcher = StaticFetcher::new(bodies.clone())
                .with_delay(Duration::from_millis(5));
            let aggregator = Aggregator::new(Arc::new(fetcher));
            let items = aggregator.fetch_all(feeds.clone(), &Normalizer::new()).await;
            assert_eq!(titles(&items), vec!["a-1", "b-1"]);
        }
    }

    #[tokio::test]
    async fn test_unresponsive_feed_times_out() {
        let aggregator = Aggregator::new(Arc::new(HangingFetcher))
            .fetch_timeout(Duration::from_millis(20));

        let items = aggregator
            .fetch_all(
                vec![descriptor("a", "uk", "https://a.example/feed")],
                &Normalizer::new(),
            )
            .await;

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fan_out_is_bounded_by_workers() {
        let bodies: Vec<(String, String)> = (0..6)
            .map(|i| {
                (
                    format!("https://f{i}.example/feed"),
                    rss_body(&[("x", Some("Mon, 01 Jan 2024 10:00:00 GMT"))]),
                )
            })
            .collect();
        let fetcher = StaticFetcher::new(
            bodies.iter().map(|(u, b)| (u.as_str(), b.clone())).collect(),
        )
        .with_delay(Duration::from_millis(10));
        let fetcher = Arc::new(fetcher);
        let aggregator = Aggregator::with_workers(fetcher.clone(), 2);

        let feeds = bodies
            .iter()
            .map(|(url, _)| descriptor("s", "t", url))
            .collect();
        let items = aggregator.fetch_all(feeds, &Normalizer::new()).await;

        assert_eq!(items.len(), 6);
        assert!(fetcher.max_in_flight.load(AtomicOrdering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let bodies = vec![
            (
                "https://a.example/feed",
                rss_body(&[
                    ("a-1", Some("Mon, 01 Jan 2024 10:00:00 GMT")),
                    ("a-2", None),
                ]),
            ),
            (
                "https://b.example/feed",
                rss_body(&[("b-1", Some("Mon, 01 Jan 2024 08:00:00 GMT"))]),
            ),
        ];
        let feeds = vec![
            descriptor("a", "uk", "https://a.example/feed"),
            descriptor("b", "uk", "https://b.example/feed"),
        ];

        let first = Aggregator::new(Arc::new(StaticFetcher::new(bodies.clone())))
            .fetch_all(feeds.clone(), &Normalizer::new())
            .await;
        let second = Aggregator::new(Arc::new(StaticFetcher::new(bodies)))
            .fetch_all(feeds, &Normalizer::new())
            .await;

        assert_eq!(titles(&first), titles(&second));
    }

    #[tokio::test]
    async fn test_no_feeds_yields_empty_result() {
        let aggregator = Aggregator::new(Arc::new(StaticFetcher::new(vec![])));
        let items = aggregator.fetch_all(vec![], &Normalizer::new()).await;
        assert!(items.is_empty());
    }
}
