//! Topic error types.

use thiserror::Error;

/// Errors that can occur during topic operations.
#[derive(Debug, Error)]
pub enum TopicsError {
    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] routing_store::StoreError),
}
