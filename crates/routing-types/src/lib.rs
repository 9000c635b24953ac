//! # routing-types
//!
//! Shared data model for the knowledge routing engine.
//!
//! This crate defines the types that flow between the clustering engine,
//! the topic lifecycle manager, the expertise aggregator, and the query
//! router: knowledge points and their embedding views, topics with their
//! memberships, expertise signals, and the configuration for discovery
//! runs and query routing.
//!
//! The engine never answers questions itself; these types only ever
//! describe stored content and the people who wrote it.

pub mod batch;
pub mod config;
pub mod content;
pub mod expertise;
pub mod query;
pub mod report;
pub mod topic;

pub use batch::{MembershipBatch, MembershipEntry};
pub use config::{DiscoveryConfig, RouterConfig};
pub use content::{ContentEmbedding, KnowledgePoint};
pub use expertise::{ExpertiseSignal, SignalType, MAX_SIGNAL_STRENGTH};
pub use query::{KnowledgeMatch, RouteResponse, SuggestedExpert, TopicMatch};
pub use report::DiscoveryReport;
pub use topic::{ClusterCandidate, Topic, TopicMembership};

/// Organization identifier.
pub type OrgId = String;

/// Person identifier (already resolved by an external identity service).
pub type PersonId = String;

/// Knowledge point identifier.
pub type KnowledgePointId = String;

/// Topic identifier (ULID).
pub type TopicId = String;

/// An embedding vector.
pub type Vector = Vec<f32>;
