//! In-memory knowledge store.
//!
//! Reference implementation of [`KnowledgeStore`] over `tokio` RwLock
//! maps. Tests run against this rather than mocks, and small single
//! process deployments can use it directly.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use routing_clustering::cosine_similarity;
use routing_types::{
    ExpertiseSignal, KnowledgePoint, PersonId, SuggestedExpert, Topic, TopicId, TopicMembership,
};

use crate::error::StoreError;
use crate::store::{KnowledgeStore, ScoredPoint};

/// Decay period length in days for read-time expert ranking.
const DECAY_PERIOD_DAYS: f64 = 30.0;

#[derive(Default)]
struct OrgState {
    points: HashMap<String, KnowledgePoint>,
    topics: HashMap<TopicId, Topic>,
    memberships: HashMap<TopicId, Vec<TopicMembership>>,
    signals: HashMap<(PersonId, TopicId), ExpertiseSignal>,
}

/// In-memory [`KnowledgeStore`] implementation.
#[derive(Default)]
pub struct InMemoryKnowledgeStore {
    orgs: RwLock<HashMap<String, OrgState>>,
}

impl InMemoryKnowledgeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a knowledge point (ingestion-side write).
    pub async fn insert_point(&self, point: KnowledgePoint) {
        let mut orgs = self.orgs.write().await;
        let org = orgs.entry(point.org_id.clone()).or_default();
        org.points.insert(point.id.clone(), point);
    }

    /// Remove a knowledge point (ingestion-side delete).
    pub async fn remove_point(&self, org_id: &str, point_id: &str) {
        let mut orgs = self.orgs.write().await;
        if let Some(org) = orgs.get_mut(org_id) {
            org.points.remove(point_id);
        }
    }

    /// The stored signal for a (person, topic) pair, if any.
    pub async fn get_signal(
        &self,
        org_id: &str,
        person_id: &str,
        topic_id: &str,
    ) -> Option<ExpertiseSignal> {
        let orgs = self.orgs.read().await;
        orgs.get(org_id)?
            .signals
            .get(&(person_id.to_string(), topic_id.to_string()))
            .cloned()
    }

    /// Number of stored topics for an organization.
    pub async fn topic_count(&self, org_id: &str) -> usize {
        let orgs = self.orgs.read().await;
        orgs.get(org_id).map(|o| o.topics.len()).unwrap_or(0)
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn search_points(
        &self,
        org_id: &str,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, StoreError> {
        let orgs = self.orgs.read().await;
        let Some(org) = orgs.get(org_id) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredPoint> = org
            .points
            .values()
            .map(|p| ScoredPoint {
                similarity: cosine_similarity(query, &p.embedding),
                point: p.clone(),
            })
            .filter(|s| s.similarity > threshold)
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        Ok(scored)
    }

    async fn fetch_corpus(&self, org_id: &str) -> Result<Vec<KnowledgePoint>, StoreError> {
        let orgs = self.orgs.read().await;
        let mut corpus: Vec<KnowledgePoint> = orgs
            .get(org_id)
            .map(|o| o.points.values().cloned().collect())
            .unwrap_or_default();
        // Stable order so clustering input does not depend on map iteration.
        corpus.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(corpus)
    }

    async fn list_topics(&self, org_id: &str) -> Result<Vec<Topic>, StoreError> {
        let orgs = self.orgs.read().await;
        let mut topics: Vec<Topic> = orgs
            .get(org_id)
            .map(|o| o.topics.values().cloned().collect())
            .unwrap_or_default();
        topics.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(topics)
    }

    async fn save_topic(&self, org_id: &str, topic: &Topic) -> Result<(), StoreError> {
        let mut orgs = self.orgs.write().await;
        let org = orgs.entry(org_id.to_string()).or_default();
        org.topics.insert(topic.id.clone(), topic.clone());
        debug!(topic_id = %topic.id, "Saved topic");
        Ok(())
    }

    async fn replace_memberships(
        &self,
        org_id: &str,
        topic_id: &TopicId,
        memberships: Vec<TopicMembership>,
    ) -> Result<(), StoreError> {
        let mut orgs = self.orgs.write().await;
        let org = orgs.entry(org_id.to_string()).or_default();
        debug!(topic_id = %topic_id, rows = memberships.len(), "Replaced memberships");
        org.memberships.insert(topic_id.clone(), memberships);
        Ok(())
    }

    async fn list_memberships(
        &self,
        org_id: &str,
        topic_id: &TopicId,
    ) -> Result<Vec<TopicMembership>, StoreError> {
        let orgs = self.orgs.read().await;
        Ok(orgs
            .get(org_id)
            .and_then(|o| o.memberships.get(topic_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_topic(&self, org_id: &str, topic_id: &TopicId) -> Result<(), StoreError> {
        let mut orgs = self.orgs.write().await;
        let org = orgs.entry(org_id.to_string()).or_default();
        org.topics.remove(topic_id);
        org.memberships.remove(topic_id);
        debug!(topic_id = %topic_id, "Deleted topic and memberships");
        Ok(())
    }

    async fn upsert_signal(
        &self,
        org_id: &str,
        signal: &ExpertiseSignal,
    ) -> Result<(), StoreError> {
        let mut orgs = self.orgs.write().await;
        let org = orgs.entry(org_id.to_string()).or_default();
        org.signals.insert(
            (signal.person_id.clone(), signal.topic_id.clone()),
            signal.clone(),
        );
        Ok(())
    }

    async fn rank_experts(
        &self,
        org_id: &str,
        topic_id: &TopicId,
        limit: usize,
    ) -> Result<Vec<SuggestedExpert>, StoreError> {
        let orgs = self.orgs.read().await;
        let Some(org) = orgs.get(org_id) else {
            return Ok(Vec::new());
        };

        let now = Utc::now();
        let mut experts: Vec<SuggestedExpert> = org
            .signals
            .values()
            .filter(|s| &s.topic_id == topic_id)
            .map(|s| {
                let elapsed_days =
                    (now - s.occurred_at).num_seconds().max(0) as f64 / 86_400.0;
                let periods = elapsed_days / DECAY_PERIOD_DAYS;
                let effective =
                    f64::from(s.strength) * f64::from(s.decay_rate).powf(periods);
                SuggestedExpert {
                    person_id: s.person_id.clone(),
                    topic_id: s.topic_id.clone(),
                    score: (effective * f64::from(s.confidence)) as f32,
                }
            })
            .collect();

        experts.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        experts.truncate(limit);
        Ok(experts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use routing_types::SignalType;

    fn make_point(id: &str, org: &str, embedding: Vec<f32>) -> KnowledgePoint {
        KnowledgePoint {
            id: id.to_string(),
            org_id: org.to_string(),
            embedding,
            summary: format!("summary for {id}"),
            keywords: vec!["deploy".to_string()],
            platform: "slack".to_string(),
            source_type: "message".to_string(),
            quality_score: 0.8,
            quality_confidence: 0.9,
            technical_depth: 1.0,
            author_id: Some("person-1".to_string()),
            created_at: Utc::now(),
        }
    }

    fn make_signal(person: &str, topic: &str, strength: f32, occurred_at: chrono::DateTime<Utc>) -> ExpertiseSignal {
        ExpertiseSignal {
            person_id: person.to_string(),
            topic_id: topic.to_string(),
            signal_type: SignalType::AuthoredStatement,
            strength,
            confidence: 1.0,
            source_artifact_id: "kp-1".to_string(),
            occurred_at,
            decay_rate: 0.95,
        }
    }

    #[tokio::test]
    async fn test_search_points_threshold_and_order() {
        let store = InMemoryKnowledgeStore::new();
        store.insert_point(make_point("a", "org", vec![1.0, 0.0])).await;
        store.insert_point(make_point("b", "org", vec![0.9, 0.1])).await;
        store.insert_point(make_point("c", "org", vec![0.0, 1.0])).await;

        let results = store
            .search_points("org", &[1.0, 0.0], 0.1, 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].point.id, "a");
        assert!((results[0].similarity - 1.0).abs() < 0.001);
        assert!(results[0].similarity >= results[1].similarity);
    }

    #[tokio::test]
    async fn test_search_points_respects_limit() {
        let store = InMemoryKnowledgeStore::new();
        for i in 0..10 {
            store
                .insert_point(make_point(&format!("p{i}"), "org", vec![1.0, 0.0]))
                .await;
        }

        let results = store
            .search_points("org", &[1.0, 0.0], 0.1, 3)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_unknown_org_is_empty() {
        let store = InMemoryKnowledgeStore::new();
        let results = store
            .search_points("nope", &[1.0, 0.0], 0.1, 10)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_corpus_is_stable() {
        let store = InMemoryKnowledgeStore::new();
        store.insert_point(make_point("b", "org", vec![1.0, 0.0])).await;
        store.insert_point(make_point("a", "org", vec![0.0, 1.0])).await;

        let corpus = store.fetch_corpus("org").await.unwrap();
        let ids: Vec<&str> = corpus.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_topic_removes_memberships() {
        let store = InMemoryKnowledgeStore::new();
        let topic = Topic::new("Test".to_string(), vec![1.0, 0.0], 3);
        let topic_id = topic.id.clone();

        store.save_topic("org", &topic).await.unwrap();
        store
            .replace_memberships(
                "org",
                &topic_id,
                vec![TopicMembership::new(topic_id.clone(), "kp-1".to_string(), 0.8)],
            )
            .await
            .unwrap();

        store.delete_topic("org", &topic_id).await.unwrap();

        assert_eq!(store.topic_count("org").await, 0);
        let rows = store.list_memberships("org", &topic_id).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_replace_memberships_is_total() {
        let store = InMemoryKnowledgeStore::new();
        let topic_id = "t1".to_string();

        store
            .replace_memberships(
                "org",
                &topic_id,
                vec![
                    TopicMembership::new(topic_id.clone(), "old-1".to_string(), 0.8),
                    TopicMembership::new(topic_id.clone(), "old-2".to_string(), 0.8),
                ],
            )
            .await
            .unwrap();

        store
            .replace_memberships(
                "org",
                &topic_id,
                vec![TopicMembership::new(topic_id.clone(), "new-1".to_string(), 0.9)],
            )
            .await
            .unwrap();

        let rows = store.list_memberships("org", &topic_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].knowledge_point_id, "new-1");
    }

    #[tokio::test]
    async fn test_upsert_signal_replaces() {
        let store = InMemoryKnowledgeStore::new();
        let now = Utc::now();

        store
            .upsert_signal("org", &make_signal("p1", "t1", 1.5, now))
            .await
            .unwrap();
        store
            .upsert_signal("org", &make_signal("p1", "t1", 0.7, now))
            .await
            .unwrap();

        let signal = store.get_signal("org", "p1", "t1").await.unwrap();
        assert!((signal.strength - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_rank_experts_orders_by_decayed_score() {
        let store = InMemoryKnowledgeStore::new();
        let now = Utc::now();

        // Same raw strength; the older signal decays below the fresh one.
        store
            .upsert_signal("org", &make_signal("fresh", "t1", 1.0, now))
            .await
            .unwrap();
        store
            .upsert_signal(
                "org",
                &make_signal("stale", "t1", 1.0, now - Duration::days(120)),
            )
            .await
            .unwrap();
        store
            .upsert_signal("org", &make_signal("other-topic", "t2", 2.0, now))
            .await
            .unwrap();

        let experts = store.rank_experts("org", &"t1".to_string(), 10).await.unwrap();
        assert_eq!(experts.len(), 2);
        assert_eq!(experts[0].person_id, "fresh");
        assert_eq!(experts[1].person_id, "stale");
        assert!(experts[1].score < experts[0].score);
        // 4 periods at 0.95: about 0.81 of the original.
        assert!((experts[1].score - 0.95f32.powf(4.0)).abs() < 0.02);
    }

    #[tokio::test]
    async fn test_rank_experts_weighs_confidence() {
        let store = InMemoryKnowledgeStore::new();
        let now = Utc::now();

        let mut confident = make_signal("confident", "t1", 1.0, now);
        confident.confidence = 1.0;
        let mut hesitant = make_signal("hesitant", "t1", 1.0, now);
        hesitant.confidence = 0.5;
        store.upsert_signal("org", &confident).await.unwrap();
        store.upsert_signal("org", &hesitant).await.unwrap();

        let experts = store.rank_experts("org", &"t1".to_string(), 10).await.unwrap();
        assert_eq!(experts[0].person_id, "confident");
        // Fresh signal: the score is strength scaled by confidence alone.
        assert!((experts[1].score - 0.5).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_rank_experts_respects_limit() {
        let store = InMemoryKnowledgeStore::new();
        let now = Utc::now();
        for i in 0..5 {
            store
                .upsert_signal("org", &make_signal(&format!("p{i}"), "t1", 1.0, now))
                .await
                .unwrap();
        }

        let experts = store.rank_experts("org", &"t1".to_string(), 2).await.unwrap();
        assert_eq!(experts.len(), 2);
    }
}
