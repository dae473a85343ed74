//! Keyword-stage scoring, result merging, and browse ordering.
//!
//! The keyword stage is a synchronous substring match with three score
//! tiers (exact > prefix > substring). The merge combines those matches
//! with semantic candidates keyed by topic id: a topic confirmed by both
//! signals keeps its keyword tier and gains a similarity-proportional
//! boost, so it ranks above single-signal topics of the same tier.

use crate::types::{SearchResults, SemanticHit, SortKey, Topic, TopicCategory, TopicMatch};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Keyword-stage score tiers.
pub const SCORE_EXACT: f32 = 1.0;
pub const SCORE_PREFIX: f32 = 0.97;
pub const SCORE_SUBSTRING: f32 = 0.93;

/// Score one lower-cased topic keyword against a lower-cased query, if it
/// matches at all.
fn keyword_score(query: &str, keyword: &str) -> Option<f32> {
    if keyword == query {
        Some(SCORE_EXACT)
    } else if keyword.starts_with(query) {
        Some(SCORE_PREFIX)
    } else if keyword.contains(query) {
        Some(SCORE_SUBSTRING)
    } else {
        None
    }
}

/// Synchronous keyword stage over the topic corpus.
///
/// Returns matches ordered score-descending with an alphabetical
/// tie-break; every match carries `has_keyword_match = true`.
pub fn keyword_stage(
    query: &str,
    topics: &[Topic],
    category: Option<TopicCategory>,
) -> Vec<TopicMatch> {
    let query = query.trim().to_lowercase();

    let mut matches: Vec<TopicMatch> = topics
        .iter()
        .filter(|topic| category.map_or(true, |c| topic.category == c))
        .filter_map(|topic| {
            keyword_score(&query, &topic.keyword.to_lowercase()).map(|score| TopicMatch {
                topic_id: topic.id.clone(),
                keyword: topic.keyword.clone(),
                score,
                has_keyword_match: true,
                has_semantic_match: false,
                similarity: None,
            })
        })
        .collect();

    sort_matches(&mut matches);
    matches
}

/// Merge semantic candidates into the keyword-stage results.
///
/// A candidate already present from the keyword stage is boosted by
/// `similarity * boost`; a semantic-only candidate enters with its
/// similarity as score. Candidates whose id is not in the corpus are
/// dropped. The result is re-sorted score-descending.
pub fn merge(
    keyword_matches: Vec<TopicMatch>,
    semantic: &[SemanticHit],
    topics: &[Topic],
    boost: f32,
) -> Vec<TopicMatch> {
    let by_id: HashMap<&str, &Topic> =
        topics.iter().map(|topic| (topic.id.as_str(), topic)).collect();

    let mut merged: HashMap<String, TopicMatch> = keyword_matches
        .into_iter()
        .map(|m| (m.topic_id.clone(), m))
        .collect();

    for hit in semantic {
        if let Some(entry) = merged.get_mut(&hit.topic_id) {
            // Confirmed by both signals
            entry.has_semantic_match = true;
            entry.similarity = Some(hit.similarity);
            entry.score += hit.similarity * boost;
        } else if let Some(topic) = by_id.get(hit.topic_id.as_str()) {
            merged.insert(
                hit.topic_id.clone(),
                TopicMatch {
                    topic_id: hit.topic_id.clone(),
                    keyword: topic.keyword.clone(),
                    score: hit.similarity,
                    has_keyword_match: false,
                    has_semantic_match: true,
                    similarity: Some(hit.similarity),
                },
            );
        } else {
            debug!(topic_id = %hit.topic_id, "semantic candidate not in corpus, dropping");
        }
    }

    let mut matches: Vec<TopicMatch> = merged.into_values().collect();
    sort_matches(&mut matches);
    matches
}

/// Score-descending order with a deterministic secondary key:
/// alphabetical by keyword, then by topic id.
fn sort_matches(matches: &mut [TopicMatch]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.keyword.to_lowercase().cmp(&b.keyword.to_lowercase()))
            .then_with(|| a.topic_id.cmp(&b.topic_id))
    });
}

/// Partition merged matches into presentation tiers, preserving order.
pub fn partition(matches: Vec<TopicMatch>) -> SearchResults {
    let mut results = SearchResults::default();
    for m in matches {
        if m.has_keyword_match {
            results.exact_matches.push(m);
        } else {
            results.related_matches.push(m);
        }
    }
    results
}

/// Order topics for the no-query browsing path.
pub fn order_topics(topics: &mut [Topic], sort: SortKey) {
    let alphabetical =
        |a: &Topic, b: &Topic| a.keyword.to_lowercase().cmp(&b.keyword.to_lowercase());

    match sort {
        SortKey::Alphabetical => topics.sort_by(alphabetical),
        SortKey::ClipCount => topics.sort_by(|a, b| {
            b.stats
                .clip_count
                .cmp(&a.stats.clip_count)
                .then_with(|| alphabetical(a, b))
        }),
        SortKey::InterviewCount => topics.sort_by(|a, b| {
            b.stats
                .interview_count
                .cmp(&a.stats.interview_count)
                .then_with(|| alphabetical(a, b))
        }),
        SortKey::Importance => topics.sort_by(|a, b| {
            b.importance_score
                .cmp(&a.importance_score)
                .then_with(|| alphabetical(a, b))
        }),
    }
}
