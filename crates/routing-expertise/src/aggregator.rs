//! Signal aggregation from topic memberships.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use routing_clustering::cosine_similarity;
use routing_store::KnowledgeStore;
use routing_types::{
    ExpertiseSignal, KnowledgePoint, MembershipBatch, SignalType, TopicMembership,
};

use crate::error::ExpertiseError;

/// Centroid similarity above which a lone point counts toward a topic.
pub const INCREMENTAL_MATCH_THRESHOLD: f32 = 0.7;

/// Source types treated as answers to a question.
const ANSWER_SOURCES: &[&str] = &["answer", "reply", "comment"];

/// Source types treated as problem resolutions.
const RESOLUTION_SOURCES: &[&str] = &["resolution", "fix", "incident", "commit"];

/// Source types treated as in-depth explanations.
const EXPLANATION_SOURCES: &[&str] = &["document", "article", "wiki"];

/// Upserts one expertise signal per (person, topic) pair.
pub struct ExpertiseAggregator {
    store: Arc<dyn KnowledgeStore>,
}

impl ExpertiseAggregator {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self { store }
    }

    /// Aggregate one membership batch from a discovery run.
    ///
    /// Entries without a resolved author carry no expertise and are
    /// skipped. A store failure for one signal does not abort the rest of
    /// the batch. Returns the number of signals upserted.
    #[instrument(skip_all, fields(org_id = %batch.org_id, entries = batch.entries.len()))]
    pub async fn process_batch(&self, batch: &MembershipBatch) -> Result<usize, ExpertiseError> {
        let mut upserted = 0;
        for entry in &batch.entries {
            let Some(author_id) = &entry.point.author_id else {
                continue;
            };
            for membership in &entry.memberships {
                let signal = build_signal(author_id, &entry.point, membership);
                match self.store.upsert_signal(&batch.org_id, &signal).await {
                    Ok(()) => upserted += 1,
                    Err(e) => {
                        warn!(
                            person_id = %signal.person_id,
                            topic_id = %signal.topic_id,
                            error = %e,
                            "Signal upsert failed, continuing"
                        );
                    }
                }
            }
        }
        debug!(upserted, "Membership batch aggregated");
        Ok(upserted)
    }

    /// Incremental path for a single freshly ingested point.
    ///
    /// Matches the point against existing topic centroids above
    /// [`INCREMENTAL_MATCH_THRESHOLD`] and upserts a signal per match.
    /// No membership rows are written; the next full discovery run owns
    /// those. Returns the number of signals upserted.
    #[instrument(skip_all, fields(point_id = %point.id))]
    pub async fn process_point(
        &self,
        org_id: &str,
        point: &KnowledgePoint,
    ) -> Result<usize, ExpertiseError> {
        let Some(author_id) = &point.author_id else {
            return Ok(0);
        };

        let topics = self.store.list_topics(org_id).await?;
        let mut upserted = 0;
        for topic in &topics {
            let similarity = cosine_similarity(&point.embedding, &topic.centroid);
            if similarity > INCREMENTAL_MATCH_THRESHOLD {
                let membership =
                    TopicMembership::new(topic.id.clone(), point.id.clone(), similarity);
                let signal = build_signal(author_id, point, &membership);
                self.store.upsert_signal(org_id, &signal).await?;
                upserted += 1;
            }
        }
        Ok(upserted)
    }
}

/// Derive the contribution kind from the point's source type and depth.
pub fn classify(point: &KnowledgePoint) -> SignalType {
    let source = point.source_type.to_lowercase();
    if EXPLANATION_SOURCES.contains(&source.as_str()) {
        SignalType::DetailedExplanation
    } else if RESOLUTION_SOURCES.contains(&source.as_str()) {
        SignalType::ProblemResolution
    } else if ANSWER_SOURCES.contains(&source.as_str()) {
        SignalType::QuickAnswer
    } else {
        SignalType::AuthoredStatement
    }
}

fn build_signal(
    author_id: &str,
    point: &KnowledgePoint,
    membership: &TopicMembership,
) -> ExpertiseSignal {
    let signal_type = classify(point);
    ExpertiseSignal {
        person_id: author_id.to_string(),
        topic_id: membership.topic_id.clone(),
        signal_type,
        strength: ExpertiseSignal::compute_strength(
            signal_type,
            point.quality_score,
            point.technical_depth,
        ),
        confidence: point.quality_confidence,
        source_artifact_id: point.id.clone(),
        occurred_at: point.created_at,
        decay_rate: signal_type.decay_rate(),
    }
}
