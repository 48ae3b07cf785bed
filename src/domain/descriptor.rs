use serde::{Deserialize, Serialize};

/// The (source, topic) identity of a configured feed plus the URL to fetch.
///
/// Descriptors are built once from configuration and owned by the catalog;
/// selection and aggregation work on borrowed or cloned copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDescriptor {
    pub source_id: String,
    pub topic_id: String,
    pub url: String,
}

impl FeedDescriptor {
    pub fn new(
        source_id: impl Into<String>,
        topic_id: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            topic_id: topic_id.into(),
            url: url.into(),
        }
    }
}
