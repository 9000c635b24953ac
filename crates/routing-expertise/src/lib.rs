//! Expertise signal aggregation.
//!
//! Turns (author, topic-membership) pairs into decay-aware expertise
//! signals. Aggregation runs behind a queue fed by discovery runs, so it
//! never blocks ingestion and only ever sees memberships that are already
//! persisted.

pub mod aggregator;
pub mod error;
pub mod queue;

pub use aggregator::ExpertiseAggregator;
pub use error::ExpertiseError;
pub use queue::ExpertiseQueue;
