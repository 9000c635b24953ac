//! Topic data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{KnowledgePointId, TopicId, Vector};

/// A persisted cluster of knowledge points sharing a thematic centroid.
///
/// Topics are owned by the knowledge store; the engine only proposes
/// create, update, and archive operations during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Unique identifier (ULID)
    pub id: TopicId,
    /// Human-readable name
    pub name: String,
    /// Centroid embedding for similarity matching
    pub centroid: Vector,
    /// Number of member knowledge points at last update
    pub member_count: usize,
    /// Confidence that this is a coherent topic (0.0 - 1.0)
    pub confidence_score: f32,
    /// When the topic was first discovered
    pub discovered_at: DateTime<Utc>,
    /// When the topic was last reconciled
    pub last_updated_at: DateTime<Utc>,
}

impl Topic {
    /// Create a new topic with a fresh ULID.
    pub fn new(name: String, centroid: Vector, member_count: usize) -> Self {
        let now = Utc::now();
        Self {
            id: ulid::Ulid::new().to_string(),
            name,
            centroid,
            member_count,
            confidence_score: Self::confidence_for_size(member_count),
            discovered_at: now,
            last_updated_at: now,
        }
    }

    /// Confidence for a cluster of the given size: min(size / 10, 1),
    /// rounded to two decimals.
    pub fn confidence_for_size(size: usize) -> f32 {
        let raw = (size as f32 / 10.0).min(1.0);
        (raw * 100.0).round() / 100.0
    }
}

/// Many-to-many link between a topic and a knowledge point.
///
/// Memberships are fully replaced whenever their owning topic is updated;
/// rows from a prior reconciliation never survive the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMembership {
    /// Owning topic
    pub topic_id: TopicId,
    /// Member knowledge point
    pub knowledge_point_id: KnowledgePointId,
    /// Similarity of the member to the topic centroid (0.0 - 1.0)
    pub similarity_score: f32,
}

impl TopicMembership {
    /// Create a new membership row, clamping the score to [0, 1].
    pub fn new(topic_id: TopicId, knowledge_point_id: KnowledgePointId, score: f32) -> Self {
        Self {
            topic_id,
            knowledge_point_id,
            similarity_score: score.clamp(0.0, 1.0),
        }
    }
}

/// A cluster produced by one clustering pass.
///
/// Transient and engine-internal: a candidate is either matched to an
/// existing topic or becomes the seed of a new one within the same
/// reconciliation run, and is never persisted directly.
#[derive(Debug, Clone)]
pub struct ClusterCandidate {
    /// Index of this cluster within the run
    pub id: usize,
    /// Indices into the validated embedding snapshot
    pub member_indices: Vec<usize>,
    /// Component-wise mean of the member vectors
    pub centroid: Vector,
    /// Number of members
    pub size: usize,
}
