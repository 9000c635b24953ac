//! Knowledge point content types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{KnowledgePointId, OrgId, PersonId, Vector};

/// One processed unit of platform content.
///
/// Produced by platform-specific extraction upstream of this engine; the
/// engine only reads these. The embedding, summary, and quality scores are
/// all computed at ingestion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgePoint {
    /// Unique identifier
    pub id: KnowledgePointId,
    /// Owning organization
    pub org_id: OrgId,
    /// Embedding vector (fixed dimension per organization)
    pub embedding: Vector,
    /// Short generated summary of the content
    pub summary: String,
    /// Keywords extracted from the content
    pub keywords: Vec<String>,
    /// Source platform (e.g. "slack", "github")
    pub platform: String,
    /// Content kind within the platform (e.g. "message", "issue", "commit")
    pub source_type: String,
    /// Content quality score (0.0 - 1.0)
    pub quality_score: f32,
    /// Confidence in the quality assessment (0.0 - 1.0)
    pub quality_confidence: f32,
    /// Technical depth multiplier applied to expertise strength
    pub technical_depth: f32,
    /// Resolved author, if identity resolution succeeded
    pub author_id: Option<PersonId>,
    /// When the content was ingested
    pub created_at: DateTime<Utc>,
}

impl KnowledgePoint {
    /// Project this point down to its clustering input view.
    pub fn content_embedding(&self) -> ContentEmbedding {
        ContentEmbedding {
            knowledge_point_id: self.id.clone(),
            vector: self.embedding.clone(),
            platform: self.platform.clone(),
            source_type: self.source_type.clone(),
        }
    }
}

/// The clustering input view of a knowledge point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEmbedding {
    /// Identifier of the backing knowledge point
    pub knowledge_point_id: KnowledgePointId,
    /// Embedding vector
    pub vector: Vector,
    /// Source platform
    pub platform: String,
    /// Content kind within the platform
    pub source_type: String,
}

impl ContentEmbedding {
    /// Check that the vector is usable for clustering.
    ///
    /// A valid embedding has exactly `dimension` finite components.
    /// Invalid embeddings are excluded from clustering, never fatal.
    pub fn is_valid(&self, dimension: usize) -> bool {
        self.vector.len() == dimension && self.vector.iter().all(|v| v.is_finite())
    }
}
