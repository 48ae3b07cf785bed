//! Immutable source×topic feed index.
//!
//! Built once from configuration at startup and never mutated afterwards,
//! so it can be shared freely across request handlers without locking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::FeedDescriptor;

/// A selection of sources and topics. An empty list means "all known ids
/// of that kind", not "none".
#[derive(Debug, Clone, Default)]
pub struct SelectionRequest {
    pub sources: Vec<String>,
    pub topics: Vec<String>,
}

/// Static catalog summary for client discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub sources: Vec<MetaEntry>,
    pub topics: Vec<MetaEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Two-level feed index: source id → topic id → descriptor, plus the
/// configured orderings of source and topic ids.
pub struct Catalog {
    feeds: HashMap<String, HashMap<String, FeedDescriptor>>,
    all_sources: Vec<String>,
    all_topics: Vec<String>,
    meta: Meta,
}

impl Catalog {
    /// Build the index from a configuration document.
    ///
    /// No semantic validation happens here beyond structural traversal.
    /// A duplicate feed or source id overwrites the earlier entry
    /// (last-write-wins) and is reported at WARN.
    pub fn new(config: &Config) -> Self {
        let mut feeds: HashMap<String, HashMap<String, FeedDescriptor>> = HashMap::new();
        let mut all_sources = Vec::with_capacity(config.sources.len());

        for source in &config.sources {
            let mut source_feeds = HashMap::new();
            for feed in &source.feeds {
                let descriptor = FeedDescriptor::new(&source.id, &feed.id, &feed.url);
                if source_feeds.insert(feed.id.clone(), descriptor).is_some() {
                    tracing::warn!(
                        "duplicate feed id {:?} in source {:?}, keeping the later entry",
                        feed.id,
                        source.id
                    );
                }
            }
            if feeds.insert(source.id.clone(), source_feeds).is_some() {
                tracing::warn!(
                    "duplicate source id {:?}, keeping the later entry",
                    source.id
                );
            }
            all_sources.push(source.id.clone());
        }

        let all_topics = config.topics.iter().map(|t| t.id.clone()).collect();

        let meta = Meta {
            sources: config
                .sources
                .iter()
                .map(|s| MetaEntry {
                    id: s.id.clone(),
                    description: s.description.clone(),
                })
                .collect(),
            topics: config
                .topics
                .iter()
                .map(|t| MetaEntry {
                    id: t.id.clone(),
                    description: t.description.clone(),
                })
                .collect(),
        };

        Self {
            feeds,
            all_sources,
            all_topics,
            meta,
        }
    }

    /// Resolve a selection to concrete feed descriptors.
    ///
    /// Empty source/topic lists resolve to all configured ids. Iteration is
    /// sources outer, topics inner, both in configuration order, which makes
    /// the selection order deterministic. A (source, topic) pair with no
    /// configured feed is skipped; unknown ids select nothing and never fail.
    pub fn select(&self, request: &SelectionRequest) -> Vec<&FeedDescriptor> {
        let sources = if request.sources.is_empty() {
            &self.all_sources
        } else {
            &request.sources
        };
        let topics = if request.topics.is_empty() {
            &self.all_topics
        } else {
            &request.topics
        };

        let mut selected = Vec::new();
        for source in sources {
            if let Some(source_feeds) = self.feeds.get(source) {
                for topic in topics {
                    if let Some(descriptor) = source_feeds.get(topic) {
                        selected.push(descriptor);
                    }
                }
            }
        }
        selected
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn all_sources(&self) -> &[String] {
        &self.all_sources
    }

    pub fn all_topics(&self) -> &[String] {
        &self.all_topics
    }
}
