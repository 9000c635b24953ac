//! Topic reconciliation.
//!
//! Matches cluster candidates against the stored topic set. Matching is
//! greedy and first-come: each existing topic can be claimed by at most
//! one candidate per run, and no global optimal assignment is attempted.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use routing_clustering::cosine_similarity;
use routing_store::KnowledgeStore;
use routing_types::{
    ClusterCandidate, KnowledgePoint, MembershipBatch, MembershipEntry, Topic, TopicMembership,
};

use crate::error::TopicsError;
use crate::naming::TopicNamer;

/// Centroid similarity above which a candidate claims an existing topic.
pub const MERGE_THRESHOLD: f32 = 0.7;

/// What one reconciliation pass did.
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// Topics created this run
    pub new_topics: usize,
    /// Topics claimed and updated this run
    pub updated_topics: usize,
    /// Topics archived as unclaimed
    pub archived_topics: usize,
    /// The membership view written this run, for the expertise queue
    pub batch: MembershipBatch,
}

/// Reconciles cluster candidates against the persisted topic set.
pub struct TopicLifecycleManager {
    store: Arc<dyn KnowledgeStore>,
    namer: TopicNamer,
    merge_threshold: f32,
}

impl TopicLifecycleManager {
    /// Create a manager with the default merge threshold.
    pub fn new(store: Arc<dyn KnowledgeStore>, namer: TopicNamer) -> Self {
        Self {
            store,
            namer,
            merge_threshold: MERGE_THRESHOLD,
        }
    }

    /// Override the merge threshold.
    pub fn with_merge_threshold(mut self, threshold: f32) -> Self {
        self.merge_threshold = threshold;
        self
    }

    /// Run one reconciliation pass.
    ///
    /// `candidates` index into `points`. Each candidate either claims and
    /// updates an unclaimed existing topic or creates a new one; topics
    /// unclaimed at the end are archived together with their memberships.
    /// A store failure for one candidate does not abort the rest of the
    /// batch.
    #[instrument(skip_all, fields(org_id = %org_id, candidates = candidates.len()))]
    pub async fn reconcile(
        &self,
        org_id: &str,
        points: &[KnowledgePoint],
        candidates: &[ClusterCandidate],
    ) -> Result<ReconcileOutcome, TopicsError> {
        let existing = self.store.list_topics(org_id).await?;
        let mut claimed: HashSet<String> = HashSet::new();

        let mut new_topics = 0;
        let mut updated_topics = 0;
        let mut entries: Vec<MembershipEntry> = Vec::new();

        for candidate in candidates {
            let matched = existing
                .iter()
                .filter(|t| !claimed.contains(&t.id))
                .map(|t| (t, cosine_similarity(&candidate.centroid, &t.centroid)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .filter(|(_, sim)| *sim > self.merge_threshold);

            let result = match matched {
                Some((topic, sim)) => {
                    claimed.insert(topic.id.clone());
                    debug!(topic_id = %topic.id, similarity = sim, "Candidate claimed existing topic");
                    self.update_topic(org_id, topic, candidate, points).await
                }
                None => self.create_topic(org_id, candidate, points).await,
            };

            match result {
                Ok((entry_batch, created)) => {
                    if created {
                        new_topics += 1;
                    } else {
                        updated_topics += 1;
                    }
                    entries.extend(entry_batch);
                }
                Err(e) => {
                    // One bad candidate must not abort the rest of the run.
                    warn!(candidate_id = candidate.id, error = %e, "Candidate write failed, continuing");
                }
            }
        }

        let mut archived_topics = 0;
        for topic in &existing {
            if !claimed.contains(&topic.id) {
                match self.store.delete_topic(org_id, &topic.id).await {
                    Ok(()) => {
                        info!(topic_id = %topic.id, name = %topic.name, "Archived unclaimed topic");
                        archived_topics += 1;
                    }
                    Err(e) => {
                        warn!(topic_id = %topic.id, error = %e, "Archive failed, continuing");
                    }
                }
            }
        }

        info!(
            new_topics,
            updated_topics, archived_topics, "Reconciliation complete"
        );

        Ok(ReconcileOutcome {
            new_topics,
            updated_topics,
            archived_topics,
            batch: MembershipBatch {
                org_id: org_id.to_string(),
                entries,
            },
        })
    }

    /// Overwrite a claimed topic from the candidate and fully replace its
    /// memberships.
    async fn update_topic(
        &self,
        org_id: &str,
        topic: &Topic,
        candidate: &ClusterCandidate,
        points: &[KnowledgePoint],
    ) -> Result<(Vec<MembershipEntry>, bool), TopicsError> {
        let mut updated = topic.clone();
        updated.centroid = candidate.centroid.clone();
        updated.member_count = candidate.size;
        updated.confidence_score = Topic::confidence_for_size(candidate.size);
        updated.last_updated_at = Utc::now();

        self.store.save_topic(org_id, &updated).await?;
        let entries = self
            .write_memberships(org_id, &updated.id, candidate, points)
            .await?;
        Ok((entries, false))
    }

    /// Turn an unmatched candidate into a new named topic.
    async fn create_topic(
        &self,
        org_id: &str,
        candidate: &ClusterCandidate,
        points: &[KnowledgePoint],
    ) -> Result<(Vec<MembershipEntry>, bool), TopicsError> {
        let members: Vec<&KnowledgePoint> = candidate
            .member_indices
            .iter()
            .map(|&i| &points[i])
            .collect();
        let name = self.namer.name_candidate(candidate.id, &members).await;

        let topic = Topic::new(name, candidate.centroid.clone(), candidate.size);
        info!(topic_id = %topic.id, name = %topic.name, size = candidate.size, "Created topic");

        self.store.save_topic(org_id, &topic).await?;
        let entries = self
            .write_memberships(org_id, &topic.id, candidate, points)
            .await?;
        Ok((entries, true))
    }

    /// Replace a topic's membership rows with the candidate's members,
    /// scored by similarity to the final centroid.
    async fn write_memberships(
        &self,
        org_id: &str,
        topic_id: &routing_types::TopicId,
        candidate: &ClusterCandidate,
        points: &[KnowledgePoint],
    ) -> Result<Vec<MembershipEntry>, TopicsError> {
        let mut rows = Vec::with_capacity(candidate.member_indices.len());
        let mut entries = Vec::with_capacity(candidate.member_indices.len());

        for &idx in &candidate.member_indices {
            let point = &points[idx];
            let score = cosine_similarity(&point.embedding, &candidate.centroid);
            let membership =
                TopicMembership::new(topic_id.to_string(), point.id.clone(), score);
            rows.push(membership.clone());
            entries.push(MembershipEntry {
                point: point.clone(),
                memberships: vec![membership],
            });
        }

        self.store.replace_memberships(org_id, topic_id, rows).await?;
        Ok(entries)
    }
}
