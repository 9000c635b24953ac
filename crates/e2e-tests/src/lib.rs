//! End-to-end test infrastructure for knowledge-routing.
//!
//! Provides a shared TestHarness and helper functions for E2E tests
//! covering the full corpus-to-query pipeline.

use std::sync::{Arc, Once};

use chrono::Utc;

use routing_store::InMemoryKnowledgeStore;
use routing_topics::{TopicDiscovery, TopicNamer};
use routing_types::{DiscoveryConfig, KnowledgePoint};

static INIT_TRACING: Once = Once::new();

/// Initialize test tracing once per process; RUST_LOG controls the level.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Shared harness for E2E tests.
///
/// Provides an in-memory store and a seeded discovery configuration so
/// pipelines behave identically across runs.
pub struct TestHarness {
    pub store: Arc<InMemoryKnowledgeStore>,
    pub config: DiscoveryConfig,
}

impl TestHarness {
    pub fn new() -> Self {
        init_tracing();
        Self {
            store: Arc::new(InMemoryKnowledgeStore::new()),
            config: DiscoveryConfig {
                dimension: 4,
                min_cluster_size: 3,
                max_clusters: 12,
                merge_threshold: 0.7,
                seed: Some(42),
            },
        }
    }

    /// A discovery engine over this harness's store, keyword naming only.
    pub fn discovery(&self) -> TopicDiscovery {
        TopicDiscovery::new(
            self.store.clone(),
            TopicNamer::keyword_only(),
            self.config.clone(),
        )
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one knowledge point with the given author and keywords.
pub fn make_point(
    id: &str,
    org_id: &str,
    embedding: Vec<f32>,
    author: &str,
    keywords: &[&str],
) -> KnowledgePoint {
    KnowledgePoint {
        id: id.to_string(),
        org_id: org_id.to_string(),
        embedding,
        summary: format!("summary for {id}"),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        platform: "slack".to_string(),
        source_type: "message".to_string(),
        quality_score: 0.8,
        quality_confidence: 0.9,
        technical_depth: 1.0,
        author_id: Some(author.to_string()),
        created_at: Utc::now(),
    }
}

/// Seed two well-separated blobs of identical vectors into the store.
///
/// Blob A (6 points, authored by alice) sits on the first axis, blob B
/// (6 points, authored by bob) on the second, so a seeded discovery run
/// produces exactly two topics.
pub async fn seed_two_blobs(store: &InMemoryKnowledgeStore, org_id: &str) {
    for i in 0..6 {
        store
            .insert_point(make_point(
                &format!("a-{i}"),
                org_id,
                vec![1.0, 0.0, 0.0, 0.0],
                "alice",
                &["deploy", "pipeline"],
            ))
            .await;
    }
    for i in 0..6 {
        store
            .insert_point(make_point(
                &format!("b-{i}"),
                org_id,
                vec![0.0, 1.0, 0.0, 0.0],
                "bob",
                &["billing", "invoice"],
            ))
            .await;
    }
}
