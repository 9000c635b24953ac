//! # routing-store
//!
//! Knowledge store boundary contract.
//!
//! The persistent store is an external collaborator: it owns topics,
//! memberships, and expertise signals, and it owns the vector-similarity
//! query and the decay-aware expert ranking. This crate defines the
//! contract the engine programs against, plus an in-memory reference
//! implementation used by tests and small deployments.
//!
//! No transactions are assumed across the writes that make up a topic
//! update; callers tolerate temporarily inconsistent topic/membership
//! state.

pub mod error;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryKnowledgeStore;
pub use store::{KnowledgeStore, ScoredPoint};
