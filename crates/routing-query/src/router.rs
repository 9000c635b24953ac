//! Query-time routing.
//!
//! Routing never returns an error: every external failure (embedding,
//! reranking, store reads) degrades to an emptier response instead.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use routing_clustering::cosine_similarity;
use routing_providers::{CompletionProvider, EmbeddingProvider};
use routing_store::{KnowledgeStore, ScoredPoint};
use routing_types::{KnowledgeMatch, RouteResponse, RouterConfig, TopicMatch};

use crate::rerank;

/// Routes a question to content matches, topic matches, and experts.
pub struct QueryRouter {
    store: Arc<dyn KnowledgeStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    ranker: Option<Arc<dyn CompletionProvider>>,
    config: RouterConfig,
}

impl QueryRouter {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: RouterConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            ranker: None,
            config,
        }
    }

    /// Attach a ranking provider for candidate reranking.
    pub fn with_ranker(mut self, ranker: Arc<dyn CompletionProvider>) -> Self {
        self.ranker = Some(ranker);
        self
    }

    /// Route one question.
    ///
    /// Steps: embed, similarity search, optional rerank, topic matching,
    /// expert lookup for the top topic. Each step that fails leaves its
    /// slice of the response empty and the rest proceeds.
    #[instrument(skip(self))]
    pub async fn route(&self, org_id: &str, query: &str) -> RouteResponse {
        let embedding = match self.embedder.embed(query).await {
            Ok(v) => v,
            Err(e) => {
                // Zero vector: no similarity anywhere, but routing proceeds.
                warn!(error = %e, "Embedding failed, substituting zero vector");
                vec![0.0; self.embedder.dimension()]
            }
        };

        let candidates = match self
            .store
            .search_points(
                org_id,
                &embedding,
                self.config.candidate_threshold,
                self.config.candidate_limit,
            )
            .await
        {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "Candidate search failed");
                Vec::new()
            }
        };

        let knowledge_matches = self.select_matches(query, candidates).await;
        let topic_matches = self.match_topics(org_id, &embedding).await;

        let suggested_experts = match topic_matches.first() {
            Some(top) => match self
                .store
                .rank_experts(org_id, &top.topic_id, self.config.expert_limit)
                .await
            {
                Ok(experts) => experts,
                Err(e) => {
                    warn!(topic_id = %top.topic_id, error = %e, "Expert ranking failed");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        debug!(
            knowledge_matches = knowledge_matches.len(),
            topic_matches = topic_matches.len(),
            suggested_experts = suggested_experts.len(),
            "Query routed"
        );

        RouteResponse {
            query: query.to_string(),
            knowledge_matches,
            suggested_experts,
            topic_matches,
        }
    }

    /// Narrow candidates to the final match list, reranking when enough
    /// candidates exist and a ranker is configured.
    async fn select_matches(&self, query: &str, candidates: Vec<ScoredPoint>) -> Vec<KnowledgeMatch> {
        let selected = if candidates.len() > self.config.rerank_min_candidates {
            match self.rerank(query, &candidates).await {
                Some(indices) => indices
                    .into_iter()
                    .map(|i| &candidates[i])
                    .map(to_match)
                    .collect(),
                None => top_by_similarity(&candidates, self.config.rerank_limit),
            }
        } else {
            top_by_similarity(&candidates, self.config.rerank_limit)
        };
        selected
    }

    async fn rerank(&self, query: &str, candidates: &[ScoredPoint]) -> Option<Vec<usize>> {
        let ranker = self.ranker.as_ref()?;
        let listing: Vec<(String, String, f32)> = candidates
            .iter()
            .map(|c| (c.point.summary.clone(), c.point.platform.clone(), c.similarity))
            .collect();
        let prompt = rerank::build_prompt(query, &listing, self.config.rerank_limit);

        match ranker.complete(&prompt).await {
            Ok(response) => {
                let parsed =
                    rerank::parse_selection(&response, candidates.len(), self.config.rerank_limit);
                if parsed.is_none() {
                    warn!("Unusable rerank response, falling back to similarity order");
                }
                parsed
            }
            Err(e) => {
                warn!(error = %e, "Rerank call failed, falling back to similarity order");
                None
            }
        }
    }

    /// Topics whose centroid clears the similarity bar, best first.
    async fn match_topics(&self, org_id: &str, embedding: &[f32]) -> Vec<TopicMatch> {
        let topics = match self.store.list_topics(org_id).await {
            Ok(topics) => topics,
            Err(e) => {
                warn!(error = %e, "Topic listing failed");
                return Vec::new();
            }
        };

        let mut matches: Vec<TopicMatch> = topics
            .into_iter()
            .filter_map(|topic| {
                let similarity = cosine_similarity(embedding, &topic.centroid);
                (similarity > self.config.topic_threshold).then(|| TopicMatch {
                    topic_id: topic.id,
                    name: topic.name,
                    similarity,
                })
            })
            .collect();
        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(self.config.topic_limit);
        matches
    }
}

fn to_match(scored: &ScoredPoint) -> KnowledgeMatch {
    KnowledgeMatch {
        knowledge_point_id: scored.point.id.clone(),
        summary: scored.point.summary.clone(),
        platform: scored.point.platform.clone(),
        similarity: scored.similarity,
    }
}

fn top_by_similarity(candidates: &[ScoredPoint], limit: usize) -> Vec<KnowledgeMatch> {
    // The store returns candidates best first already.
    candidates.iter().take(limit).map(to_match).collect()
}
