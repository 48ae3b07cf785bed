use feed_rs::model::MediaObject;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{EstuaryError, Result};
use crate::domain::{FeedDescriptor, FeedItem};

#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a fetched body and map every entry to a canonical [`FeedItem`]
    /// stamped with the descriptor's (source, topic) identity.
    ///
    /// `published` falls back to the entry's `updated` timestamp; entries
    /// carrying neither keep `None`.
    pub fn normalize(&self, descriptor: &FeedDescriptor, body: &[u8]) -> Result<Vec<FeedItem>> {
        let feed = parser::parse(body).map_err(|e| EstuaryError::FeedParse(e.to_string()))?;

        let items = feed
            .entries
            .into_iter()
            .map(|entry| {
                let thumbnail = select_thumbnail(&entry.media);

                FeedItem {
                    source_id: descriptor.source_id.clone(),
                    topic_id: descriptor.topic_id.clone(),
                    title: entry
                        .title
                        .map(|t| decode_html_entities(&t.content).to_string())
                        .unwrap_or_default(),
                    description: entry
                        .summary
                        .map(|s| decode_html_entities(&s.content).to_string())
                        .unwrap_or_default(),
                    link: entry
                        .links
                        .first()
                        .map(|l| l.href.clone())
                        .unwrap_or_default(),
                    published: entry.published.or(entry.updated),
                    thumbnail,
                }
            })
            .collect();

        Ok(items)
    }
}

/// Resolve an item's thumbnail URL: an image-typed media content object
/// (which is also where enclosures end up) wins, otherwise the first
/// `media:thumbnail` entry. Items with neither get no thumbnail.
fn select_thumbnail(media: &[MediaObject]) -> Option<String> {
    let image_content = media
        .iter()
        .flat_map(|m| m.content.iter())
        .find(|c| {
            c.content_type
                .as_ref()
                .is_some_and(|t| t.to_string().starts_with("image/"))
        })
        .and_then(|c| c.url.as_ref().map(|u| u.to_string()));

    image_content.or_else(|| {
        media
            .iter()
            .find_map(|m| m.thumbnails.first())
            .map(|t| t.image.uri.clone())
    })
}
