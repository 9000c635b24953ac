//! Store error types.

use thiserror::Error;

/// Errors surfaced by a knowledge store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Topic not found
    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    /// Knowledge point not found
    #[error("Knowledge point not found: {0}")]
    PointNotFound(String),

    /// Backend failure (connection, serialization, etc.)
    #[error("Store backend error: {0}")]
    Backend(String),
}
