use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalized feed entry, stamped with the identity of the feed it
/// came from. Items carry no identity beyond their fields and are never
/// mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub source_id: String,
    pub topic_id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl FeedItem {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

/// The merged, request-scoped aggregation result, ascending by `published`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<FeedItem>,
}
