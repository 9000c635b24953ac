//! Two-stage topic naming.
//!
//! New topics are named by a generative completion provider given member
//! summaries, keyword frequencies, and platform distribution; any failure
//! or empty result falls back deterministically to the two most frequent
//! member keywords joined by `" & "`, or a placeholder built from the
//! candidate id.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use routing_providers::CompletionProvider;
use routing_types::KnowledgePoint;

/// Maximum member summaries included in a naming prompt.
const SAMPLED_SUMMARIES: usize = 5;

/// Maximum length of a topic name.
const MAX_NAME_LENGTH: usize = 60;

/// Names topic candidates.
pub struct TopicNamer {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl TopicNamer {
    /// Create a namer backed by a completion provider.
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Create a keyword-only namer.
    pub fn keyword_only() -> Self {
        Self { provider: None }
    }

    /// Produce a name for a cluster candidate.
    ///
    /// Never fails: provider problems degrade to the keyword fallback.
    pub async fn name_candidate(&self, candidate_id: usize, members: &[&KnowledgePoint]) -> String {
        if let Some(provider) = &self.provider {
            let prompt = self.build_prompt(members);
            match provider.complete(&prompt).await {
                Ok(response) => {
                    if let Some(name) = parse_name(&response) {
                        return name;
                    }
                    warn!(candidate_id, "Empty naming response, using keyword fallback");
                }
                Err(e) => {
                    warn!(candidate_id, error = %e, "Naming call failed, using keyword fallback");
                }
            }
        }

        self.keyword_name(candidate_id, members)
    }

    /// Deterministic fallback: the two most frequent member keywords
    /// joined by `" & "`, or `Topic <candidate id>` with no keywords.
    pub fn keyword_name(&self, candidate_id: usize, members: &[&KnowledgePoint]) -> String {
        let frequencies = keyword_frequencies(members);
        let mut ranked: Vec<(&String, &usize)> = frequencies.iter().collect();
        // Count descending, then alphabetical, so ties are stable.
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let top: Vec<&str> = ranked.iter().take(2).map(|(k, _)| k.as_str()).collect();
        if top.is_empty() {
            format!("Topic {candidate_id}")
        } else {
            top.join(" & ")
        }
    }

    fn build_prompt(&self, members: &[&KnowledgePoint]) -> String {
        let summaries: Vec<String> = members
            .iter()
            .take(SAMPLED_SUMMARIES)
            .map(|p| format!("- {}", p.summary))
            .collect();

        let frequencies = keyword_frequencies(members);
        let mut keywords: Vec<(&String, &usize)> = frequencies.iter().collect();
        keywords.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let keyword_line: Vec<String> = keywords
            .iter()
            .take(10)
            .map(|(k, n)| format!("{k} ({n})"))
            .collect();

        let mut platforms: HashMap<&str, usize> = HashMap::new();
        let mut source_types: HashMap<&str, usize> = HashMap::new();
        for p in members {
            *platforms.entry(p.platform.as_str()).or_insert(0) += 1;
            *source_types.entry(p.source_type.as_str()).or_insert(0) += 1;
        }
        let mut platform_line: Vec<String> = platforms
            .iter()
            .map(|(k, n)| format!("{k}: {n}"))
            .collect();
        platform_line.sort();
        let mut source_line: Vec<String> = source_types
            .iter()
            .map(|(k, n)| format!("{k}: {n}"))
            .collect();
        source_line.sort();

        format!(
            r#"Generate a concise topic name (2-5 words) for a cluster of related workplace content.
The name should capture the shared theme.

Sample summaries:
{}

Keyword frequency: {}
Platforms: {}
Source types: {}

Respond with ONLY the topic name, nothing else."#,
            summaries.join("\n"),
            keyword_line.join(", "),
            platform_line.join(", "),
            source_line.join(", "),
        )
    }
}

/// Aggregate keyword counts across member points.
fn keyword_frequencies(members: &[&KnowledgePoint]) -> HashMap<String, usize> {
    let mut frequencies = HashMap::new();
    for point in members {
        for keyword in &point.keywords {
            *frequencies.entry(keyword.to_lowercase()).or_insert(0) += 1;
        }
    }
    frequencies
}

/// Clean a provider response into a usable name, or None.
fn parse_name(response: &str) -> Option<String> {
    let first_line = response.lines().next().unwrap_or("");
    let cleaned = first_line.trim().trim_matches('"').trim_matches('\'').trim();
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.len() > MAX_NAME_LENGTH {
        // Provider output is arbitrary UTF-8; cut on a char boundary.
        let mut cut = MAX_NAME_LENGTH;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        let truncated = &cleaned[..cut];
        return Some(match truncated.rfind(' ') {
            Some(last_space) => truncated[..last_space].to_string(),
            None => truncated.to_string(),
        });
    }

    Some(cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use routing_providers::{FixedCompletionProvider, NoOpCompletionProvider};

    fn make_point(id: &str, summary: &str, keywords: &[&str]) -> KnowledgePoint {
        KnowledgePoint {
            id: id.to_string(),
            org_id: "org".to_string(),
            embedding: vec![1.0, 0.0],
            summary: summary.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            platform: "slack".to_string(),
            source_type: "message".to_string(),
            quality_score: 0.8,
            quality_confidence: 0.9,
            technical_depth: 1.0,
            author_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_name_from_provider() {
        let namer = TopicNamer::new(Arc::new(FixedCompletionProvider::new("Deploy Pipeline")));
        let p1 = make_point("a", "deploy failed", &["deploy"]);
        let name = namer.name_candidate(0, &[&p1]).await;
        assert_eq!(name, "Deploy Pipeline");
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_keywords() {
        let namer = TopicNamer::new(Arc::new(NoOpCompletionProvider));
        let p1 = make_point("a", "s1", &["kubernetes", "deploy"]);
        let p2 = make_point("b", "s2", &["kubernetes", "helm"]);
        let p3 = make_point("c", "s3", &["deploy", "kubernetes"]);

        let name = namer.name_candidate(4, &[&p1, &p2, &p3]).await;
        assert_eq!(name, "kubernetes & deploy");
    }

    #[tokio::test]
    async fn test_empty_response_falls_back() {
        let namer = TopicNamer::new(Arc::new(FixedCompletionProvider::new("   ")));
        let p1 = make_point("a", "s1", &["grafana"]);
        let name = namer.name_candidate(0, &[&p1]).await;
        assert_eq!(name, "grafana");
    }

    #[tokio::test]
    async fn test_no_keywords_uses_candidate_id() {
        let namer = TopicNamer::keyword_only();
        let p1 = make_point("a", "s1", &[]);
        let name = namer.name_candidate(7, &[&p1]).await;
        assert_eq!(name, "Topic 7");
    }

    #[test]
    fn test_keyword_tie_is_stable() {
        let namer = TopicNamer::keyword_only();
        let p1 = make_point("a", "s1", &["zebra", "alpha"]);
        let name = namer.keyword_name(0, &[&p1]);
        assert_eq!(name, "alpha & zebra");
    }

    #[test]
    fn test_parse_name_strips_quotes_and_truncates() {
        assert_eq!(parse_name("\"Billing Questions\""), Some("Billing Questions".to_string()));
        assert_eq!(parse_name("  Incident Response \nextra"), Some("Incident Response".to_string()));
        assert_eq!(parse_name(""), None);

        let long = "word ".repeat(30);
        let parsed = parse_name(&long).unwrap();
        assert!(parsed.len() <= MAX_NAME_LENGTH);
        assert!(!parsed.ends_with(' '));
    }

    #[test]
    fn test_parse_name_handles_multibyte_at_cut() {
        // A multi-byte char straddling the length limit must not panic.
        let mut long = "a".repeat(MAX_NAME_LENGTH - 1);
        long.push('é');
        long.push_str(" tail");
        let parsed = parse_name(&long).unwrap();
        assert!(parsed.len() <= MAX_NAME_LENGTH);
        assert!(parsed.starts_with('a'));

        let all_multibyte = "é".repeat(MAX_NAME_LENGTH);
        let parsed = parse_name(&all_multibyte).unwrap();
        assert!(parsed.len() <= MAX_NAME_LENGTH);
        assert!(!parsed.is_empty());
    }

    #[tokio::test]
    async fn test_name_multibyte_response_falls_through_cleanly() {
        let mut response = "a".repeat(MAX_NAME_LENGTH - 1);
        response.push('é');
        response.push_str(" and more");
        let namer = TopicNamer::new(Arc::new(FixedCompletionProvider::new(response)));
        let p1 = make_point("a", "s1", &["deploy"]);
        let name = namer.name_candidate(0, &[&p1]).await;
        assert!(!name.is_empty());
        assert!(name.len() <= MAX_NAME_LENGTH);
    }

    #[test]
    fn test_prompt_contains_context() {
        let namer = TopicNamer::keyword_only();
        let p1 = make_point("a", "first summary", &["deploy"]);
        let p2 = make_point("b", "second summary", &["deploy", "ci"]);
        let prompt = namer.build_prompt(&[&p1, &p2]);

        assert!(prompt.contains("first summary"));
        assert!(prompt.contains("second summary"));
        assert!(prompt.contains("deploy (2)"));
        assert!(prompt.contains("slack: 2"));
    }
}
