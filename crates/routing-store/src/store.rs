//! The knowledge store contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use routing_types::{
    ExpertiseSignal, KnowledgePoint, SuggestedExpert, Topic, TopicId, TopicMembership,
};

use crate::error::StoreError;

/// A knowledge point scored against a query embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    /// The matched point
    pub point: KnowledgePoint,
    /// Cosine similarity to the query embedding
    pub similarity: f32,
}

/// Boundary contract for the persistent knowledge store.
///
/// Decay semantics for expert ranking live behind this contract: the
/// store scores each signal as
/// `strength × decay_rate ^ (elapsed_days / 30) × confidence` at read
/// time, so the engine never re-derives effective strength itself.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Vector similarity search over knowledge points.
    ///
    /// Returns points whose similarity to the query exceeds `threshold`,
    /// best first, at most `limit` of them.
    async fn search_points(
        &self,
        org_id: &str,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, StoreError>;

    /// Full-corpus retrieval of an organization's knowledge points for
    /// clustering input.
    async fn fetch_corpus(&self, org_id: &str) -> Result<Vec<KnowledgePoint>, StoreError>;

    /// List the organization's current topics.
    async fn list_topics(&self, org_id: &str) -> Result<Vec<Topic>, StoreError>;

    /// Create or overwrite a topic.
    async fn save_topic(&self, org_id: &str, topic: &Topic) -> Result<(), StoreError>;

    /// Replace all membership rows for a topic.
    ///
    /// This is total replacement, never a merge: rows from a prior
    /// reconciliation do not survive.
    async fn replace_memberships(
        &self,
        org_id: &str,
        topic_id: &TopicId,
        memberships: Vec<TopicMembership>,
    ) -> Result<(), StoreError>;

    /// Membership rows for a topic.
    async fn list_memberships(
        &self,
        org_id: &str,
        topic_id: &TopicId,
    ) -> Result<Vec<TopicMembership>, StoreError>;

    /// Delete a topic together with its membership rows.
    async fn delete_topic(&self, org_id: &str, topic_id: &TopicId) -> Result<(), StoreError>;

    /// Upsert one expertise signal keyed on (person, topic).
    ///
    /// Replace semantics: a new contribution for the same pair overwrites
    /// the stored signal; strengths are recomputed, never summed.
    async fn upsert_signal(&self, org_id: &str, signal: &ExpertiseSignal)
        -> Result<(), StoreError>;

    /// Ranked experts for a topic, decay applied at read time.
    async fn rank_experts(
        &self,
        org_id: &str,
        topic_id: &TopicId,
        limit: usize,
    ) -> Result<Vec<SuggestedExpert>, StoreError>;
}
