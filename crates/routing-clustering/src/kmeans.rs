//! K-means++ clustering over content embeddings.
//!
//! Cluster count selection is a deterministic step function of corpus
//! size and diversity; initialization is K-means++ with roulette-wheel
//! sampling; iteration is Lloyd's algorithm under cosine distance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use routing_types::{ClusterCandidate, ContentEmbedding, DiscoveryConfig};

use crate::similarity::{calculate_centroid, cosine_distance, normalize};

/// Hard cap on Lloyd's iterations per run.
const MAX_ITERATIONS: usize = 100;

/// Deterministic cluster count for a corpus.
///
/// Base K starts at 2 and steps up with corpus size; spanning more than
/// one platform adds 2 and spanning more than two source types adds 1,
/// rewarding diversity with finer granularity. The result is capped at
/// `max_clusters`.
pub fn optimal_cluster_count(
    corpus_size: usize,
    platform_count: usize,
    source_type_count: usize,
    max_clusters: usize,
) -> usize {
    let base = match corpus_size {
        n if n >= 150 => 12,
        n if n >= 100 => 8,
        n if n >= 50 => 6,
        n if n >= 25 => 4,
        n if n >= 10 => 3,
        _ => 2,
    };

    let mut k = base;
    if platform_count > 1 {
        k += 2;
    }
    if source_type_count > 2 {
        k += 1;
    }

    k.min(max_clusters)
}

/// Groups a snapshot of content embeddings into cluster candidates.
pub struct ClusteringEngine {
    config: DiscoveryConfig,
}

impl ClusteringEngine {
    /// Create an engine for the given discovery configuration.
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Cluster a corpus snapshot.
    ///
    /// Invalid embeddings (wrong dimension, non-finite components) are
    /// excluded and logged. Member indices on the returned candidates
    /// refer to positions in the input slice. Clusters smaller than
    /// `min_cluster_size` are dropped; their points are simply excluded
    /// from topic formation this run. An empty or fully-invalid input
    /// yields an empty list, never an error.
    pub fn cluster(&self, embeddings: &[ContentEmbedding]) -> Vec<ClusterCandidate> {
        let dim = self.config.dimension;

        let valid: Vec<usize> = embeddings
            .iter()
            .enumerate()
            .filter_map(|(i, e)| {
                if e.is_valid(dim) {
                    Some(i)
                } else {
                    warn!(
                        knowledge_point_id = %e.knowledge_point_id,
                        vector_len = e.vector.len(),
                        "Skipping invalid embedding"
                    );
                    None
                }
            })
            .collect();

        if valid.is_empty() {
            return Vec::new();
        }

        let platforms: std::collections::HashSet<&str> =
            valid.iter().map(|&i| embeddings[i].platform.as_str()).collect();
        let source_types: std::collections::HashSet<&str> =
            valid
                .iter()
                .map(|&i| embeddings[i].source_type.as_str())
                .collect();

        let k = optimal_cluster_count(
            valid.len(),
            platforms.len(),
            source_types.len(),
            self.config.max_clusters,
        )
        .min(valid.len());

        debug!(
            corpus_size = valid.len(),
            skipped = embeddings.len() - valid.len(),
            k,
            "Clustering corpus snapshot"
        );

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let points: Vec<&[f32]> = valid.iter().map(|&i| embeddings[i].vector.as_slice()).collect();
        let mut centroids = init_centroids(&points, k, &mut rng);

        let mut assignments: Vec<usize> = vec![usize::MAX; points.len()];
        for iteration in 0..MAX_ITERATIONS {
            let new_assignments: Vec<usize> = points
                .iter()
                .map(|p| nearest_centroid(p, &centroids))
                .collect();

            if new_assignments == assignments {
                debug!(iteration, "Assignments stable");
                break;
            }
            assignments = new_assignments;

            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&[f32]> = points
                    .iter()
                    .zip(assignments.iter())
                    .filter(|(_, &a)| a == cluster)
                    .map(|(p, _)| *p)
                    .collect();

                if members.is_empty() {
                    // Reseed dead clusters rather than leaving them empty.
                    *centroid = random_vector(dim, &mut rng);
                } else {
                    *centroid = calculate_centroid(&members);
                }
            }
        }

        let mut candidates = Vec::new();
        for cluster in 0..k {
            let member_indices: Vec<usize> = assignments
                .iter()
                .enumerate()
                .filter(|(_, &a)| a == cluster)
                .map(|(local, _)| valid[local])
                .collect();

            if member_indices.len() < self.config.min_cluster_size {
                debug!(
                    cluster,
                    size = member_indices.len(),
                    min = self.config.min_cluster_size,
                    "Dropping undersized cluster"
                );
                continue;
            }

            let members: Vec<&[f32]> = member_indices
                .iter()
                .map(|&i| embeddings[i].vector.as_slice())
                .collect();
            let centroid = calculate_centroid(&members);
            let size = member_indices.len();

            candidates.push(ClusterCandidate {
                id: candidates.len(),
                member_indices,
                centroid,
                size,
            });
        }

        debug!(clusters = candidates.len(), "Clustering complete");
        candidates
    }
}

/// K-means++ initialization.
///
/// The first centroid is chosen uniformly at random; each subsequent one
/// is sampled with probability proportional to its squared cosine
/// distance from the nearest already-chosen centroid. This avoids the
/// collocated seeds plain random init can produce on embedding data.
fn init_centroids(points: &[&[f32]], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);
    let first = rng.random_range(0..points.len());
    centroids.push(points[first].to_vec());

    while centroids.len() < k {
        let weights: Vec<f32> = points
            .iter()
            .map(|p| {
                let nearest = centroids
                    .iter()
                    .map(|c| cosine_distance(p, c))
                    .fold(f32::MAX, f32::min);
                nearest * nearest
            })
            .collect();

        let total: f32 = weights.iter().sum();
        let chosen = if total <= f32::EPSILON {
            // All points sit on existing centroids; any pick is as good.
            rng.random_range(0..points.len())
        } else {
            roulette_wheel(&weights, total, rng)
        };

        centroids.push(points[chosen].to_vec());
    }

    centroids
}

/// Sample an index with probability proportional to its weight.
///
/// Zero-weight entries are never selected.
fn roulette_wheel(weights: &[f32], total: f32, rng: &mut StdRng) -> usize {
    let mut remaining = rng.random::<f32>() * total;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        remaining -= w;
        if remaining <= 0.0 {
            return i;
        }
    }
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Index of the centroid minimizing cosine distance to the point.
fn nearest_centroid(point: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = cosine_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// A fresh random unit vector in the embedding space.
fn random_vector(dim: usize, rng: &mut StdRng) -> Vec<f32> {
    let mut v: Vec<f32> = (0..dim).map(|_| rng.random::<f32>() * 2.0 - 1.0).collect();
    normalize(&mut v);
    v
}
