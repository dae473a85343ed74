//! End-to-end engine tests over in-memory collaborators.

use async_trait::async_trait;
use glossa::semantic::{SemanticProvider, SemanticSearchOptions};
use glossa::store::DocumentStore;
use glossa::{
    GlossaryConfig, GlossaryEngine, GlossaryError, MemoryStore, MockSemanticProvider, Result,
    SemanticHit, SortKey, TopicCategory,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

fn archive_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(
        "topics",
        "t1",
        json!({"keyword": "Selma", "category": "event", "importanceScore": 9}),
    );
    store.insert(
        "topics",
        "t2",
        json!({"keyword": "Selma March", "category": "event", "importanceScore": 7}),
    );
    store.insert(
        "topics",
        "t3",
        json!({"keyword": "Boycott", "category": "concept", "importanceScore": 4}),
    );
    store.insert(
        "topics",
        "t4",
        json!({"keyword": "Voting Rights", "category": "legal", "importanceScore": 8}),
    );

    store.insert("interviews", "int-1", json!({}));
    store.insert("interviews", "int-2", json!({}));
    store.insert_sub(
        "interviews",
        "int-1",
        "clips",
        "c1",
        json!({"keywords": "selma, boycott", "timestamp": "00:10 - 00:40"}),
    );
    store.insert_sub(
        "interviews",
        "int-1",
        "clips",
        "c2",
        json!({"keywords": ["selma"], "timestamp": "[01:00 - 01:30.500]"}),
    );
    store.insert_sub(
        "interviews",
        "int-2",
        "clips",
        "c3",
        json!({"keywords": "Selma", "timestamp": "1:00:00 - 1:00:30"}),
    );
    store
}

fn engine(semantic: impl SemanticProvider + 'static) -> GlossaryEngine {
    GlossaryEngine::new(
        GlossaryConfig::default(),
        Arc::new(archive_store()),
        Arc::new(semantic),
    )
}

#[tokio::test]
async fn keyword_only_search_when_semantic_unavailable() {
    let engine = engine(MockSemanticProvider::unavailable());

    let results = engine.search("selma", None).await.unwrap();

    let keywords: Vec<&str> = results
        .exact_matches
        .iter()
        .map(|m| m.keyword.as_str())
        .collect();
    assert_eq!(keywords, vec!["Selma", "Selma March"]);
    assert_eq!(results.exact_matches[0].score, 1.0);
    assert_eq!(results.exact_matches[1].score, 0.97);
    assert!(results.related_matches.is_empty());
    assert!(results.exact_matches.iter().all(|m| !m.has_semantic_match));
}

#[tokio::test]
async fn semantic_stage_adds_related_matches() {
    let engine = engine(MockSemanticProvider::new(vec![
        SemanticHit {
            topic_id: "t1".to_string(),
            similarity: 0.9,
        },
        SemanticHit {
            topic_id: "t4".to_string(),
            similarity: 0.7,
        },
    ]));

    let results = engine.search("selma", None).await.unwrap();

    // Selma confirmed by both signals gains the boost
    let selma = &results.exact_matches[0];
    assert_eq!(selma.keyword, "Selma");
    assert!((selma.score - 1.27).abs() < 1e-6);
    assert!(selma.has_keyword_match && selma.has_semantic_match);
    assert_eq!(selma.similarity, Some(0.9));

    // Voting Rights never matched the keyword stage
    assert_eq!(results.related_matches.len(), 1);
    let related = &results.related_matches[0];
    assert_eq!(related.keyword, "Voting Rights");
    assert!(!related.has_keyword_match);
    assert_eq!(related.score, 0.7);
}

#[tokio::test]
async fn semantic_failure_degrades_to_keyword_results() {
    let engine = engine(MockSemanticProvider::failing());

    let results = engine.search("selma", None).await.unwrap();

    assert_eq!(results.exact_matches.len(), 2);
    assert!(results.related_matches.is_empty());
}

#[tokio::test]
async fn below_threshold_candidates_are_filtered() {
    // Default min_similarity is 0.4
    let engine = engine(MockSemanticProvider::new(vec![SemanticHit {
        topic_id: "t4".to_string(),
        similarity: 0.2,
    }]));

    let results = engine.search("selma", None).await.unwrap();
    assert!(results.related_matches.is_empty());
}

#[tokio::test]
async fn usage_stats_aggregate_across_interviews() {
    let engine = engine(MockSemanticProvider::unavailable());

    let topics = engine.topics().await.unwrap();
    let selma = topics.iter().find(|t| t.keyword == "Selma").unwrap();

    // c1 30s + c2 30.5s + c3 30s, rounded half-up
    assert_eq!(selma.stats.clip_count, 3);
    assert_eq!(selma.stats.interview_count, 2);
    assert_eq!(selma.stats.total_length_seconds, 91);

    let boycott = topics.iter().find(|t| t.keyword == "Boycott").unwrap();
    assert_eq!(boycott.stats.clip_count, 1);
    assert_eq!(boycott.stats.interview_count, 1);
    assert_eq!(boycott.stats.total_length_seconds, 30);
}

#[tokio::test]
async fn browse_sorts_by_clip_count() {
    let engine = engine(MockSemanticProvider::unavailable());

    let topics = engine.browse(None, SortKey::ClipCount).await.unwrap();
    assert_eq!(topics[0].keyword, "Selma");
    assert_eq!(topics[1].keyword, "Boycott");
}

#[tokio::test]
async fn category_filter_applies_to_both_stages() {
    let engine = engine(MockSemanticProvider::unavailable());

    let results = engine
        .search("selma", Some(TopicCategory::Concept))
        .await
        .unwrap();
    assert!(results.is_empty());

    let topics = engine
        .browse(Some(TopicCategory::Event), SortKey::Alphabetical)
        .await
        .unwrap();
    assert_eq!(topics.len(), 2);
}

struct OfflineStore;

#[async_trait]
impl DocumentStore for OfflineStore {
    async fn list_collection(&self, _collection: &str) -> Result<Vec<(String, Value)>> {
        Err(GlossaryError::CorpusUnavailable("store offline".to_string()))
    }

    async fn list_subcollection(
        &self,
        _collection: &str,
        _parent_id: &str,
        _sub: &str,
    ) -> Result<Vec<(String, Value)>> {
        Err(GlossaryError::CorpusUnavailable("store offline".to_string()))
    }
}

#[tokio::test]
async fn corpus_failure_is_the_only_hard_error() {
    let engine = GlossaryEngine::new(
        GlossaryConfig::default(),
        Arc::new(OfflineStore),
        Arc::new(MockSemanticProvider::unavailable()),
    );

    let err = engine.search("selma", None).await.unwrap_err();
    assert!(matches!(err, GlossaryError::CorpusUnavailable(_)));
}

/// Provider that stalls long enough for another query to overtake it.
struct SlowProvider {
    hits: Vec<SemanticHit>,
    delay: Duration,
}

#[async_trait]
impl SemanticProvider for SlowProvider {
    async fn is_available(&self) -> bool {
        true
    }

    async fn search(
        &self,
        _query: &str,
        _options: &SemanticSearchOptions,
    ) -> Result<Vec<SemanticHit>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.hits.clone())
    }
}

#[tokio::test]
async fn newer_query_supersedes_an_in_flight_one() {
    let engine = Arc::new(GlossaryEngine::new(
        GlossaryConfig::default(),
        Arc::new(archive_store()),
        Arc::new(SlowProvider {
            hits: Vec::new(),
            delay: Duration::from_millis(200),
        }),
    ));

    let slow = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.search("selma", None).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = engine.search("boycott", None).await;

    let superseded = slow.await.unwrap().unwrap_err();
    assert!(matches!(superseded, GlossaryError::Superseded));

    let fast = fast.unwrap();
    assert_eq!(fast.exact_matches[0].keyword, "Boycott");
}

#[tokio::test]
async fn semantic_timeout_degrades_to_keyword_results() {
    let mut config = GlossaryConfig::default();
    config.semantic.timeout_seconds = 1;

    let engine = GlossaryEngine::new(
        config,
        Arc::new(archive_store()),
        Arc::new(SlowProvider {
            hits: vec![SemanticHit {
                topic_id: "t4".to_string(),
                similarity: 0.9,
            }],
            delay: Duration::from_secs(2),
        }),
    );

    let results = engine.search("selma", None).await.unwrap();

    // The stalled stage never contributes
    assert_eq!(results.exact_matches.len(), 2);
    assert!(results.related_matches.is_empty());
}

/// Store whose contents can be swapped out from the test body.
struct SharedStore(tokio::sync::RwLock<MemoryStore>);

#[async_trait]
impl DocumentStore for SharedStore {
    async fn list_collection(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        self.0.read().await.list_collection(collection).await
    }

    async fn list_subcollection(
        &self,
        collection: &str,
        parent_id: &str,
        sub: &str,
    ) -> Result<Vec<(String, Value)>> {
        self.0
            .read()
            .await
            .list_subcollection(collection, parent_id, sub)
            .await
    }
}

#[tokio::test]
async fn refresh_picks_up_new_topics() {
    let shared = Arc::new(SharedStore(tokio::sync::RwLock::new(archive_store())));
    let engine = GlossaryEngine::new(
        GlossaryConfig::default(),
        Arc::clone(&shared) as Arc<dyn DocumentStore>,
        Arc::new(MockSemanticProvider::unavailable()),
    );

    assert_eq!(engine.topics().await.unwrap().len(), 4);

    shared
        .0
        .write()
        .await
        .insert("topics", "t5", json!({"keyword": "Freedom Rides"}));

    // The cached corpus is stable until an explicit refresh
    assert_eq!(engine.topics().await.unwrap().len(), 4);

    engine.refresh().await;
    assert_eq!(engine.topics().await.unwrap().len(), 5);
}
