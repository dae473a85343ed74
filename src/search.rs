//! Glossary search engine orchestrating the keyword and semantic stages.
//!
//! Per-query lifecycle: the keyword stage runs synchronously over the
//! cached corpus and always yields a usable result set; the semantic
//! stage then enhances it when the collaborator is available. Semantic
//! failures degrade silently to keyword-only results. "Latest query
//! wins": an invocation superseded by a newer one while its semantic
//! call was in flight returns [`GlossaryError::Superseded`] instead of a
//! stale result set.

use crate::cache::{CorpusCache, QueryCache, QueryCacheKey};
use crate::config::GlossaryConfig;
use crate::error::{GlossaryError, Result};
use crate::ranking;
use crate::semantic::{SemanticProvider, SemanticSearchOptions};
use crate::stats;
use crate::store::{self, DocumentStore};
use crate::types::{SearchResults, SemanticHit, SortKey, Topic, TopicCategory, UsageStats};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Unified topic search engine.
pub struct GlossaryEngine {
    config: GlossaryConfig,
    store: Arc<dyn DocumentStore>,
    semantic: Arc<dyn SemanticProvider>,
    corpus: CorpusCache,
    query_cache: Option<QueryCache>,
    generation: AtomicU64,
}

impl GlossaryEngine {
    pub fn new(
        config: GlossaryConfig,
        store: Arc<dyn DocumentStore>,
        semantic: Arc<dyn SemanticProvider>,
    ) -> Self {
        let query_cache = config.cache.enable_query_cache.then(|| {
            QueryCache::new(
                config.cache.query_cache_size,
                Duration::from_secs(config.cache.query_cache_ttl_seconds),
            )
        });

        info!("initializing glossary search engine");

        Self {
            config,
            store,
            semantic,
            corpus: CorpusCache::new(),
            query_cache,
            generation: AtomicU64::new(0),
        }
    }

    /// The topic corpus, enriched with usage statistics. Loaded from the
    /// store on first use, cached afterwards.
    ///
    /// Statistics failures are recoverable: topics load with zeroed
    /// stats. A topic-corpus failure is a hard error.
    pub async fn topics(&self) -> Result<Arc<Vec<Topic>>> {
        if let Some(cached) = self.corpus.get().await {
            debug!("corpus cache hit");
            return Ok(cached);
        }

        let mut topics = store::fetch_topics(self.store.as_ref(), &self.config.store).await?;

        let usage = match self.usage_stats().await {
            Ok(usage) => usage,
            Err(err) => {
                warn!(%err, "usage statistics unavailable, falling back to zeroed stats");
                HashMap::new()
            }
        };

        for topic in &mut topics {
            topic.stats = usage
                .get(&topic.keyword.to_lowercase())
                .copied()
                .unwrap_or_default();
        }

        info!(topics = topics.len(), "topic corpus loaded");
        Ok(self.corpus.set(topics).await)
    }

    /// Aggregate usage statistics across the full clip corpus.
    pub async fn usage_stats(&self) -> Result<HashMap<String, UsageStats>> {
        let clips = store::fetch_clips(self.store.as_ref(), &self.config.store).await?;
        Ok(stats::aggregate(&clips))
    }

    /// Drop cached corpus and query results; the next call refetches.
    pub async fn refresh(&self) {
        self.corpus.invalidate().await;
        if let Some(cache) = &self.query_cache {
            cache.clear();
        }
    }

    /// No-query browsing path: category filter plus a total order.
    pub async fn browse(
        &self,
        category: Option<TopicCategory>,
        sort: SortKey,
    ) -> Result<Vec<Topic>> {
        let topics = self.topics().await?;

        let mut filtered: Vec<Topic> = topics
            .iter()
            .filter(|topic| category.map_or(true, |c| topic.category == c))
            .cloned()
            .collect();

        ranking::order_topics(&mut filtered, sort);
        Ok(filtered)
    }

    /// Keyword stage only: synchronous over the cached corpus, never
    /// touches the network once the corpus is loaded.
    pub async fn keyword_search(
        &self,
        query: &str,
        category: Option<TopicCategory>,
    ) -> Result<SearchResults> {
        let topics = self.topics().await?;
        Ok(ranking::partition(ranking::keyword_stage(query, &topics, category)))
    }

    /// Full two-stage search: keyword matching, then semantic enhancement
    /// when the collaborator is available.
    ///
    /// A semantic failure or timeout leaves the keyword results standing;
    /// only a corpus-fetch failure or supersession is an error.
    pub async fn search(
        &self,
        query: &str,
        category: Option<TopicCategory>,
    ) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let topics = self.topics().await?;

        let cache_key = self.query_cache.as_ref().map(|_| {
            QueryCacheKey::new(
                query,
                category,
                self.config.semantic.limit,
                self.config.semantic.min_similarity,
            )
        });

        if let (Some(cache), Some(key)) = (&self.query_cache, &cache_key) {
            if let Some(cached) = cache.get(key).await {
                debug!(%query, "query cache hit");
                return Ok((*cached).clone());
            }
        }

        let keyword_matches = ranking::keyword_stage(query, &topics, category);
        debug!(%query, count = keyword_matches.len(), "keyword stage complete");

        let merged = if self.semantic.is_available().await {
            match self.semantic_stage(query, category).await {
                Ok(hits) => {
                    debug!(%query, count = hits.len(), "semantic stage complete");
                    ranking::merge(keyword_matches, &hits, &topics, self.config.semantic.boost)
                }
                Err(err) => {
                    warn!(%query, %err, "semantic stage failed, serving keyword-only results");
                    keyword_matches
                }
            }
        } else {
            debug!(%query, "semantic search unavailable, keyword-only results");
            keyword_matches
        };

        // Latest query wins: a newer invocation owns the visible results.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(%query, "search superseded, discarding results");
            return Err(GlossaryError::Superseded);
        }

        let results = ranking::partition(merged);

        if let (Some(cache), Some(key)) = (&self.query_cache, cache_key) {
            cache.insert(key, results.clone()).await;
        }

        Ok(results)
    }

    /// Semantic stage under the configured deadline. Expiry is reported
    /// as a semantic-stage failure.
    async fn semantic_stage(
        &self,
        query: &str,
        category: Option<TopicCategory>,
    ) -> Result<Vec<SemanticHit>> {
        let options = SemanticSearchOptions::from_config(&self.config.semantic, category);
        let deadline = Duration::from_secs(self.config.semantic.timeout_seconds);

        match tokio::time::timeout(deadline, self.semantic.search(query, &options)).await {
            Ok(result) => result,
            Err(_) => Err(GlossaryError::SemanticSearchFailed(format!(
                "timed out after {}s",
                self.config.semantic.timeout_seconds
            ))),
        }
    }
}
