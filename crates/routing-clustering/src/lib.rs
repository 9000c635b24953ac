//! # routing-clustering
//!
//! Clustering engine for topic discovery.
//!
//! Groups a snapshot of content embeddings into K clusters using K-means++
//! initialization and Lloyd's iteration under cosine distance. The cluster
//! count K is a deterministic step function of corpus size and diversity.
//!
//! This is heuristic clustering, not exact optimization: no convergence
//! guarantee is asserted, and callers must not assume determinism across
//! runs unless they pin the RNG seed.

pub mod kmeans;
pub mod similarity;

pub use kmeans::{optimal_cluster_count, ClusteringEngine};
pub use similarity::{calculate_centroid, cosine_distance, cosine_similarity, normalize};
