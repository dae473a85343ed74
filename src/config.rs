//! Configuration for the glossary search system.

use crate::error::{GlossaryError, Result};
use crate::types::SortKey;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration, one section per concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossaryConfig {
    pub store: StoreConfig,
    pub semantic: SemanticConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

impl GlossaryConfig {
    /// Load configuration from a toml file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| GlossaryError::Config(e.to_string()))
    }
}

/// Document-store access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the JSON REST facade over the document store.
    pub base_url: String,

    /// Collection holding the topic corpus.
    pub topics_collection: String,

    /// Collection holding interview documents.
    pub interviews_collection: String,

    /// Sub-collection of clips under each interview.
    pub clips_subcollection: String,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v1".to_string(),
            topics_collection: "topics".to_string(),
            interviews_collection: "interviews".to_string(),
            clips_subcollection: "clips".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Semantic-search collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Endpoint of the remote embedding/similarity service.
    pub endpoint: String,

    /// Cap on semantic candidates per query.
    pub limit: usize,

    /// Minimum similarity the collaborator filters to.
    pub min_similarity: f32,

    /// Deadline for the semantic call; expiry is treated as a
    /// semantic-stage failure.
    pub timeout_seconds: u64,

    /// Score increment factor when a topic is confirmed by both signals:
    /// `score += similarity * boost`.
    pub boost: f32,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/semantic".to_string(),
            limit: 40,
            min_similarity: 0.4,
            timeout_seconds: 8,
            boost: 0.3,
        }
    }
}

/// Search behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Ordering used when browsing without a query.
    pub default_sort: SortKey,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_sort: SortKey::Alphabetical,
        }
    }
}

/// Query-result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the per-query result cache.
    pub enable_query_cache: bool,

    /// Query cache size (number of entries).
    pub query_cache_size: u64,

    /// Query cache TTL in seconds.
    pub query_cache_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable_query_cache: true,
            query_cache_size: 256,
            query_cache_ttl_seconds: 300, // 5 minutes
        }
    }
}
