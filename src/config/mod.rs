//! Feed catalog configuration.
//!
//! The configuration document lists the publishers ("sources") with their
//! per-topic feeds, and the set of topics. It is loaded once at startup;
//! a load or parse failure is fatal and no partial service starts.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub topics: Vec<TopicConfig>,
}

/// A publisher and its per-topic feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

/// A single feed within a source. `id` names the topic the feed covers.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub id: String,
    pub url: String,
}

/// A topic shared across sources.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicConfig {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Config {
    /// Load a configuration document from `path`.
    ///
    /// TOML is the primary format; a path ending in `.json` is parsed as
    /// JSON instead. Missing fields default to empty lists.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Json {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Toml {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
