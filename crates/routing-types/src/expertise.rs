//! Expertise signal types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{KnowledgePointId, PersonId, TopicId};

/// Upper bound on expertise signal strength.
pub const MAX_SIGNAL_STRENGTH: f32 = 2.0;

/// The kind of contribution behind an expertise signal.
///
/// Each kind carries a base strength multiplier and a per-period decay
/// rate; heavier contributions start stronger and fade slower.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SignalType {
    /// Plain authored content
    AuthoredStatement,
    /// Short reply that answered a question
    QuickAnswer,
    /// Contribution that resolved a reported problem
    ProblemResolution,
    /// In-depth technical explanation
    DetailedExplanation,
}

impl SignalType {
    /// Base strength multiplier for this contribution kind.
    pub fn base_multiplier(&self) -> f32 {
        match self {
            SignalType::AuthoredStatement => 1.0,
            SignalType::QuickAnswer => 0.9,
            SignalType::ProblemResolution => 1.1,
            SignalType::DetailedExplanation => 1.2,
        }
    }

    /// Per-period decay rate applied at read time by the store.
    pub fn decay_rate(&self) -> f32 {
        match self {
            SignalType::AuthoredStatement => 0.95,
            SignalType::QuickAnswer => 0.95,
            SignalType::ProblemResolution => 0.98,
            SignalType::DetailedExplanation => 0.97,
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalType::AuthoredStatement => write!(f, "authored-statement"),
            SignalType::QuickAnswer => write!(f, "quick-answer"),
            SignalType::ProblemResolution => write!(f, "problem-resolution"),
            SignalType::DetailedExplanation => write!(f, "detailed-explanation"),
        }
    }
}

/// A scored, decayable record linking a person to a topic via a specific
/// contribution.
///
/// One logical signal exists per (person, topic) pair; upserting a new
/// contribution for the same pair recomputes strength rather than summing
/// it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertiseSignal {
    /// The person this signal is about
    pub person_id: PersonId,
    /// The topic the person contributed to
    pub topic_id: TopicId,
    /// Kind of contribution
    pub signal_type: SignalType,
    /// Signal strength (0.0 - 2.0)
    pub strength: f32,
    /// Confidence mirrored from the content's quality confidence (0.0 - 1.0)
    pub confidence: f32,
    /// The knowledge point that produced this signal
    pub source_artifact_id: KnowledgePointId,
    /// When the contribution occurred
    pub occurred_at: DateTime<Utc>,
    /// Per-period decay rate (0.0 - 1.0]
    pub decay_rate: f32,
}

impl ExpertiseSignal {
    /// Compute signal strength for a contribution.
    ///
    /// Strength is the signal type's base multiplier scaled by the
    /// content's quality score and technical-depth multiplier, capped at
    /// [`MAX_SIGNAL_STRENGTH`].
    pub fn compute_strength(signal_type: SignalType, quality_score: f32, technical_depth: f32) -> f32 {
        (signal_type.base_multiplier() * quality_score * technical_depth)
            .clamp(0.0, MAX_SIGNAL_STRENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_multipliers() {
        assert!((SignalType::AuthoredStatement.base_multiplier() - 1.0).abs() < f32::EPSILON);
        assert!((SignalType::ProblemResolution.base_multiplier() - 1.1).abs() < f32::EPSILON);
        assert!((SignalType::DetailedExplanation.base_multiplier() - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_decay_rates_in_range() {
        for signal_type in [
            SignalType::AuthoredStatement,
            SignalType::QuickAnswer,
            SignalType::ProblemResolution,
            SignalType::DetailedExplanation,
        ] {
            let rate = signal_type.decay_rate();
            assert!((0.95..=0.98).contains(&rate), "{signal_type}: {rate}");
        }
    }

    #[test]
    fn test_compute_strength() {
        let s = ExpertiseSignal::compute_strength(SignalType::DetailedExplanation, 0.8, 1.1);
        assert!((s - 1.2 * 0.8 * 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_compute_strength_caps_at_max() {
        let s = ExpertiseSignal::compute_strength(SignalType::DetailedExplanation, 1.0, 5.0);
        assert!((s - MAX_SIGNAL_STRENGTH).abs() < f32::EPSILON);
    }

    #[test]
    fn test_compute_strength_never_negative() {
        let s = ExpertiseSignal::compute_strength(SignalType::AuthoredStatement, -1.0, 1.0);
        assert!(s.abs() < f32::EPSILON);
    }
}
