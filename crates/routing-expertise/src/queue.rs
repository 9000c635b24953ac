//! Background aggregation queue.
//!
//! Discovery runs push a [`MembershipBatch`] after their store writes have
//! committed; a worker task drains the queue and aggregates each batch in
//! arrival order. Sending never blocks the caller, so a slow store stalls
//! only the worker.

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use routing_types::MembershipBatch;

use crate::aggregator::ExpertiseAggregator;

/// Handle to the aggregation worker.
pub struct ExpertiseQueue {
    tx: UnboundedSender<MembershipBatch>,
    handle: JoinHandle<()>,
}

impl ExpertiseQueue {
    /// Spawn the worker task.
    pub fn start(aggregator: ExpertiseAggregator) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<MembershipBatch>();
        let handle = tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                let org_id = batch.org_id.clone();
                if let Err(e) = aggregator.process_batch(&batch).await {
                    warn!(org_id = %org_id, error = %e, "Batch aggregation failed");
                }
            }
            info!("Expertise queue drained, worker stopping");
        });
        Self { tx, handle }
    }

    /// Sender for discovery runs to signal completed membership writes.
    pub fn sender(&self) -> UnboundedSender<MembershipBatch> {
        self.tx.clone()
    }

    /// Close the queue and wait for the worker to drain it.
    pub async fn shutdown(self) {
        drop(self.tx);
        if self.handle.await.is_err() {
            warn!("Expertise worker ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use routing_store::InMemoryKnowledgeStore;
    use routing_types::{KnowledgePoint, MembershipEntry, TopicMembership};

    fn batch(org_id: &str, point_id: &str, topic_id: &str, source_type: &str) -> MembershipBatch {
        let point = KnowledgePoint {
            id: point_id.to_string(),
            org_id: org_id.to_string(),
            embedding: vec![1.0, 0.0],
            summary: "s".to_string(),
            keywords: vec![],
            platform: "slack".to_string(),
            source_type: source_type.to_string(),
            quality_score: 0.8,
            quality_confidence: 0.9,
            technical_depth: 1.0,
            author_id: Some("alice".to_string()),
            created_at: Utc::now(),
        };
        let membership = TopicMembership::new(topic_id.to_string(), point.id.clone(), 0.9);
        MembershipBatch {
            org_id: org_id.to_string(),
            entries: vec![MembershipEntry {
                point,
                memberships: vec![membership],
            }],
        }
    }

    #[tokio::test]
    async fn test_queue_drains_before_shutdown() {
        let store = Arc::new(InMemoryKnowledgeStore::new());
        let queue = ExpertiseQueue::start(ExpertiseAggregator::new(store.clone()));

        let tx = queue.sender();
        tx.send(batch("org", "kp-1", "topic-1", "message")).unwrap();
        tx.send(batch("org", "kp-2", "topic-2", "message")).unwrap();
        drop(tx);
        queue.shutdown().await;

        assert!(store.get_signal("org", "alice", "topic-1").await.is_some());
        assert!(store.get_signal("org", "alice", "topic-2").await.is_some());
    }

    #[tokio::test]
    async fn test_later_batch_wins_for_same_pair() {
        let store = Arc::new(InMemoryKnowledgeStore::new());
        let queue = ExpertiseQueue::start(ExpertiseAggregator::new(store.clone()));

        let tx = queue.sender();
        tx.send(batch("org", "kp-1", "topic-1", "message")).unwrap();
        tx.send(batch("org", "kp-2", "topic-1", "wiki")).unwrap();
        drop(tx);
        queue.shutdown().await;

        // Arrival order is preserved, so the wiki contribution is stored.
        let signal = store.get_signal("org", "alice", "topic-1").await.unwrap();
        assert_eq!(signal.source_artifact_id, "kp-2");
    }
}
