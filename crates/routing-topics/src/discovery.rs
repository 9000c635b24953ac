//! Full-corpus topic discovery runs.
//!
//! One run is a complete snapshot pass: fetch the organization's corpus,
//! cluster it, reconcile the candidates against the stored topic set, and
//! only then hand the written membership view to the expertise queue. Runs
//! for the same organization are serialized behind a per-org lock so the
//! topic set never sees interleaved writers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use routing_clustering::ClusteringEngine;
use routing_store::KnowledgeStore;
use routing_types::{ContentEmbedding, DiscoveryConfig, DiscoveryReport, MembershipBatch, OrgId};

use crate::error::TopicsError;
use crate::lifecycle::TopicLifecycleManager;
use crate::naming::TopicNamer;

/// Orchestrates discovery runs per organization.
pub struct TopicDiscovery {
    store: Arc<dyn KnowledgeStore>,
    lifecycle: TopicLifecycleManager,
    engine: ClusteringEngine,
    config: DiscoveryConfig,
    membership_tx: Option<UnboundedSender<MembershipBatch>>,
    locks: Mutex<HashMap<OrgId, Arc<Mutex<()>>>>,
}

impl TopicDiscovery {
    pub fn new(store: Arc<dyn KnowledgeStore>, namer: TopicNamer, config: DiscoveryConfig) -> Self {
        let lifecycle = TopicLifecycleManager::new(store.clone(), namer)
            .with_merge_threshold(config.merge_threshold);
        Self {
            store,
            lifecycle,
            engine: ClusteringEngine::new(config.clone()),
            config,
            membership_tx: None,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Attach the expertise-aggregation queue. Each run sends one batch
    /// after all topic and membership writes have committed.
    pub fn with_membership_queue(mut self, tx: UnboundedSender<MembershipBatch>) -> Self {
        self.membership_tx = Some(tx);
        self
    }

    /// Run one full discovery pass for an organization.
    ///
    /// If fewer valid embeddings exist than `min_cluster_size`, the run is
    /// a no-op and the stored topic set is left untouched.
    #[instrument(skip(self))]
    pub async fn run(&self, org_id: &str) -> Result<DiscoveryReport, TopicsError> {
        let lock = self.org_lock(org_id).await;
        let _guard = lock.lock().await;

        let points = self.store.fetch_corpus(org_id).await?;
        let embeddings: Vec<ContentEmbedding> =
            points.iter().map(|p| p.content_embedding()).collect();

        let valid_points = embeddings
            .iter()
            .filter(|e| e.is_valid(self.config.dimension))
            .count();
        let skipped_points = embeddings.len() - valid_points;

        if valid_points < self.config.min_cluster_size {
            warn!(
                valid_points,
                min_cluster_size = self.config.min_cluster_size,
                "Corpus too small for discovery, leaving topics untouched"
            );
            return Ok(DiscoveryReport {
                valid_points,
                skipped_points,
                ..DiscoveryReport::noop(org_id.to_string())
            });
        }

        let candidates = self.engine.cluster(&embeddings);
        let outcome = self.lifecycle.reconcile(org_id, &points, &candidates).await?;

        // The queue only sees memberships that are already persisted.
        if let Some(tx) = &self.membership_tx {
            if !outcome.batch.entries.is_empty() && tx.send(outcome.batch).is_err() {
                warn!("Expertise queue closed, dropping membership batch");
            }
        }

        let report = DiscoveryReport {
            org_id: org_id.to_string(),
            valid_points,
            skipped_points,
            clusters: candidates.len(),
            new_topics: outcome.new_topics,
            updated_topics: outcome.updated_topics,
            archived_topics: outcome.archived_topics,
            ran_at: Utc::now(),
        };
        info!(
            clusters = report.clusters,
            new_topics = report.new_topics,
            updated_topics = report.updated_topics,
            archived_topics = report.archived_topics,
            "Discovery run complete"
        );
        Ok(report)
    }

    async fn org_lock(&self, org_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(org_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
