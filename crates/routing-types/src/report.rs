//! Discovery run reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::OrgId;

/// Outcome of one full reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// Organization the run covered
    pub org_id: OrgId,
    /// Valid embeddings that entered clustering
    pub valid_points: usize,
    /// Embeddings excluded as invalid
    pub skipped_points: usize,
    /// Clusters surviving the minimum-size filter
    pub clusters: usize,
    /// Topics created this run
    pub new_topics: usize,
    /// Existing topics claimed and updated this run
    pub updated_topics: usize,
    /// Topics archived as unclaimed at the end of the run
    pub archived_topics: usize,
    /// When the run completed
    pub ran_at: DateTime<Utc>,
}

impl DiscoveryReport {
    /// An empty report for a run that did no work.
    pub fn noop(org_id: OrgId) -> Self {
        Self {
            org_id,
            valid_points: 0,
            skipped_points: 0,
            clusters: 0,
            new_topics: 0,
            updated_topics: 0,
            archived_topics: 0,
            ran_at: Utc::now(),
        }
    }
}
