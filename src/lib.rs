//! # Estuary
//!
//! A news aggregation service that merges externally-hosted RSS/Atom feeds,
//! grouped by source (publisher) and topic (category), into a single
//! time-ordered stream.
//!
//! ## Architecture
//!
//! ```text
//! Catalog → Aggregator → (per-feed: Fetcher → Normalizer) → merged items
//! ```
//!
//! - [`catalog`]: immutable source×topic index with feed selection
//! - [`aggregator`]: bounded concurrent fan-out with per-feed failure isolation
//! - [`fetcher`]: HTTP retrieval behind an async trait seam
//! - [`normalizer`]: RSS/Atom entries to unified domain items
//! - [`server`]: axum HTTP transport (`/feeds`, `/feeds/meta`)
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the HTTP service
//! estuary --config feeds.toml serve --addr 127.0.0.1:3000
//!
//! # One-shot aggregation to stdout
//! estuary items --sources bbc --topics technology,uk
//!
//! # Show the configured sources and topics
//! estuary meta
//! ```
//!
//! Every request fetches the selected feeds fresh; nothing is persisted or
//! cached across requests. Feeds that fail or time out are logged and simply
//! contribute no items.

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// catalog, aggregator, normalizer.
pub mod app;

/// Concurrent feed fan-out and result merging.
///
/// - [`Aggregator`](aggregator::Aggregator): semaphore-bounded parallel
///   fetching with a per-feed deadline and a final stable sort by
///   publication time
pub mod aggregator;

/// Immutable source×topic feed index.
///
/// - [`Catalog`](catalog::Catalog): two-level feed map built once from
///   configuration, plus selection and the discovery metadata view
pub mod catalog;

/// Command-line interface using clap.
///
/// Defines the CLI structure and subcommands:
/// - `serve` - Run the HTTP service
/// - `items` - One-shot aggregation printed as JSON
/// - `meta` - Print source/topic metadata
pub mod cli;

/// Feed catalog configuration loading (TOML or JSON).
pub mod config;

/// Core domain models.
///
/// - [`FeedDescriptor`](domain::FeedDescriptor): (source, topic, url) identity
/// - [`FeedItem`](domain::FeedItem): normalized feed entry
pub mod domain;

/// Feed body retrieval.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for feed fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0 entries into
/// unified [`FeedItem`](domain::FeedItem) structs, including thumbnail
/// resolution from media content and `media:thumbnail` entries.
pub mod normalizer;

/// HTTP transport built with axum.
pub mod server;
