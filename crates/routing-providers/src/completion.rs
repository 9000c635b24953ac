//! Generative completion provider contract.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Remote generative-language capability: `complete(prompt) -> text`.
///
/// The response format is a light protocol owned by each call site
/// (free text for topic naming, comma-separated indices for reranking)
/// and must always be parsed defensively.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// A completion provider that always fails.
///
/// Forces callers down their deterministic fallbacks (keyword naming,
/// similarity-order reranking).
pub struct NoOpCompletionProvider;

#[async_trait]
impl CompletionProvider for NoOpCompletionProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::NotConfigured(
            "no completion provider".to_string(),
        ))
    }
}

/// A completion provider returning a fixed response, for tests.
pub struct FixedCompletionProvider {
    response: String,
}

impl FixedCompletionProvider {
    /// Create a provider that always returns `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for FixedCompletionProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(self.response.clone())
    }
}
