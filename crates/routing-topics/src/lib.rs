//! # routing-topics
//!
//! Topic lifecycle management for the knowledge routing engine.
//!
//! A discovery run is a full-snapshot reconciliation: the current corpus
//! is clustered, the resulting candidates are matched against the stored
//! topic set, matched topics are updated, unmatched candidates become new
//! topics, and every topic left unclaimed at the end of the run is
//! archived. There is no long-term topic history, only the latest
//! reconciliation's view.
//!
//! ## Features
//! - Greedy candidate-to-topic matching with stable topic identities
//! - Two-stage topic naming (generative provider with keyword fallback)
//! - Full membership replacement on every topic update
//! - Per-organization run locks (single-writer discipline)
//! - Completion signalling to the expertise aggregator

pub mod discovery;
pub mod error;
pub mod lifecycle;
pub mod naming;

pub use discovery::TopicDiscovery;
pub use error::TopicsError;
pub use lifecycle::{ReconcileOutcome, TopicLifecycleManager};
pub use naming::TopicNamer;
