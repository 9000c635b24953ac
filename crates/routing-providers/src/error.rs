//! Provider error types.

use thiserror::Error;

/// Errors from external embedding or completion providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider is not configured
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Remote call failed
    #[error("Provider call failed: {0}")]
    CallFailed(String),

    /// Provider returned an unusable response
    #[error("Unusable provider response: {0}")]
    BadResponse(String),
}
