//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for topic discovery runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Fixed embedding dimension for the organization
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Minimum members for a cluster to become or update a topic
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,

    /// Hard cap on the number of clusters per run
    #[serde(default = "default_max_clusters")]
    pub max_clusters: usize,

    /// Centroid similarity above which a candidate claims an existing topic
    #[serde(default = "default_merge_threshold")]
    pub merge_threshold: f32,

    /// Optional RNG seed for deterministic clustering (tests)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            min_cluster_size: default_min_cluster_size(),
            max_clusters: default_max_clusters(),
            merge_threshold: default_merge_threshold(),
            seed: None,
        }
    }
}

fn default_dimension() -> usize {
    1536
}
fn default_min_cluster_size() -> usize {
    3
}
fn default_max_clusters() -> usize {
    12
}
fn default_merge_threshold() -> f32 {
    0.7
}

/// Configuration for the query router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Maximum candidate knowledge points retrieved per query
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,

    /// Minimum similarity for a candidate to be retrieved at all
    #[serde(default = "default_candidate_threshold")]
    pub candidate_threshold: f32,

    /// Rerank only when more than this many candidates exist
    #[serde(default = "default_rerank_min_candidates")]
    pub rerank_min_candidates: usize,

    /// Maximum results kept after reranking (or similarity fallback)
    #[serde(default = "default_rerank_limit")]
    pub rerank_limit: usize,

    /// Minimum query-to-centroid similarity for a topic match
    #[serde(default = "default_topic_threshold")]
    pub topic_threshold: f32,

    /// Maximum topic matches returned
    #[serde(default = "default_topic_limit")]
    pub topic_limit: usize,

    /// Maximum experts suggested for the top topic
    #[serde(default = "default_expert_limit")]
    pub expert_limit: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            candidate_threshold: default_candidate_threshold(),
            rerank_min_candidates: default_rerank_min_candidates(),
            rerank_limit: default_rerank_limit(),
            topic_threshold: default_topic_threshold(),
            topic_limit: default_topic_limit(),
            expert_limit: default_expert_limit(),
        }
    }
}

fn default_candidate_limit() -> usize {
    50
}
fn default_candidate_threshold() -> f32 {
    0.1
}
fn default_rerank_min_candidates() -> usize {
    3
}
fn default_rerank_limit() -> usize {
    3
}
fn default_topic_threshold() -> f32 {
    0.6
}
fn default_topic_limit() -> usize {
    3
}
fn default_expert_limit() -> usize {
    3
}
