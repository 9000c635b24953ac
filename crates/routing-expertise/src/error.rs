//! Error types for expertise aggregation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpertiseError {
    #[error("Store error: {0}")]
    Store(#[from] routing_store::StoreError),
}
