//! Embedding provider contract.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Remote embedding capability: `embed(text) -> vector[D]`.
///
/// Implementations handle the API call, batching, and rate limiting.
/// Callers substitute a zero vector when a call fails.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embedding dimension this provider produces.
    fn dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// An embedding provider that always fails.
///
/// Forces callers down their zero-vector fallback path; useful in tests
/// and in deployments without an embedding service.
pub struct NoOpEmbeddingProvider {
    dimension: usize,
}

impl NoOpEmbeddingProvider {
    /// Create a no-op provider reporting the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingProvider for NoOpEmbeddingProvider {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::NotConfigured(
            "no embedding provider".to_string(),
        ))
    }
}
