//! Query routing result types.

use serde::{Deserialize, Serialize};

use crate::{KnowledgePointId, PersonId, TopicId};

/// A stored knowledge point matched to a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeMatch {
    /// The matched knowledge point
    pub knowledge_point_id: KnowledgePointId,
    /// Summary snippet to show the asker
    pub summary: String,
    /// Source platform
    pub platform: String,
    /// Cosine similarity to the query embedding
    pub similarity: f32,
}

/// A topic matched to a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMatch {
    /// The matched topic
    pub topic_id: TopicId,
    /// Topic name
    pub name: String,
    /// Cosine similarity of the query to the topic centroid
    pub similarity: f32,
}

/// A person suggested as likely able to answer a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedExpert {
    /// The suggested person
    pub person_id: PersonId,
    /// Topic the suggestion is based on
    pub topic_id: TopicId,
    /// Decay-adjusted expertise score
    pub score: f32,
}

/// The routing result for one question.
///
/// The engine's only legitimate outputs: ranked references to stored
/// content and ranked people. Never a synthesized answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    /// The original question
    pub query: String,
    /// Ranked content matches
    pub knowledge_matches: Vec<KnowledgeMatch>,
    /// Ranked people likely able to answer
    pub suggested_experts: Vec<SuggestedExpert>,
    /// Topics the question falls under
    pub topic_matches: Vec<TopicMatch>,
}

impl RouteResponse {
    /// An empty response for the given question.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response() {
        let resp = RouteResponse::empty("who owns billing?");
        assert_eq!(resp.query, "who owns billing?");
        assert!(resp.knowledge_matches.is_empty());
        assert!(resp.suggested_experts.is_empty());
        assert!(resp.topic_matches.is_empty());
    }

    #[test]
    fn test_response_serialization() {
        let resp = RouteResponse {
            query: "q".to_string(),
            knowledge_matches: vec![KnowledgeMatch {
                knowledge_point_id: "kp-1".to_string(),
                summary: "s".to_string(),
                platform: "slack".to_string(),
                similarity: 0.9,
            }],
            suggested_experts: vec![],
            topic_matches: vec![],
        };
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: RouteResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.knowledge_matches.len(), 1);
        assert_eq!(parsed.knowledge_matches[0].knowledge_point_id, "kp-1");
    }
}
