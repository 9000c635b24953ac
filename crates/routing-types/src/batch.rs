//! Membership completion messages.
//!
//! A reconciliation run signals the expertise aggregator only after its
//! membership writes have landed, by sending one of these batches over a
//! queue. This replaces the timed-delay handoff an aggregator might
//! otherwise race against.

use serde::{Deserialize, Serialize};

use crate::{KnowledgePoint, OrgId, TopicMembership};

/// One knowledge point together with its current topic memberships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipEntry {
    /// The member point
    pub point: KnowledgePoint,
    /// The memberships written for it this run
    pub memberships: Vec<TopicMembership>,
}

/// The membership view produced by one completed reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipBatch {
    /// Organization the run covered
    pub org_id: OrgId,
    /// Points with their freshly written memberships
    pub entries: Vec<MembershipEntry>,
}
