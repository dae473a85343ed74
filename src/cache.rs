//! Corpus and query-result caching.

use crate::types::{SearchResults, Topic, TopicCategory};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Session-scoped cache for the enriched topic corpus.
///
/// Populated on first use and explicitly invalidated by the owner; there
/// is no TTL because the corpus is immutable within a session.
#[derive(Default)]
pub struct CorpusCache {
    topics: RwLock<Option<Arc<Vec<Topic>>>>,
}

impl CorpusCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Arc<Vec<Topic>>> {
        self.topics.read().await.clone()
    }

    pub async fn set(&self, topics: Vec<Topic>) -> Arc<Vec<Topic>> {
        let topics = Arc::new(topics);
        *self.topics.write().await = Some(Arc::clone(&topics));
        topics
    }

    pub async fn invalidate(&self) {
        *self.topics.write().await = None;
    }
}

/// Cache key for merged query results.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QueryCacheKey {
    query: String,
    category: Option<TopicCategory>,
    limit: usize,
    threshold: String, // Store as string for hashing
}

impl QueryCacheKey {
    pub fn new(
        query: &str,
        category: Option<TopicCategory>,
        limit: usize,
        threshold: f32,
    ) -> Self {
        Self {
            query: query.to_lowercase(),
            category,
            limit,
            threshold: format!("{threshold:.6}"),
        }
    }
}

/// Cache for merged, partitioned search results.
pub struct QueryCache {
    cache: Cache<QueryCacheKey, Arc<SearchResults>>,
}

impl QueryCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &QueryCacheKey) -> Option<Arc<SearchResults>> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: QueryCacheKey, value: SearchResults) {
        self.cache.insert(key, Arc::new(value)).await;
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
