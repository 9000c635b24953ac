//! Defensive parsing of rerank responses.
//!
//! The ranking provider is asked for a comma-separated list of 1-based
//! candidate indices. Anything else (empty output, prose, out-of-range
//! indices) is treated as a failed rerank and callers fall back to raw
//! similarity order.

use tracing::debug;

/// Parse a rerank response into 0-based candidate indices.
///
/// Accepts at most `limit` indices; duplicates and surrounding prose on
/// valid entries are tolerated, but any token that is not a valid 1-based
/// index into `candidate_count` invalidates the whole response.
pub fn parse_selection(response: &str, candidate_count: usize, limit: usize) -> Option<Vec<usize>> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut selected = Vec::new();
    for token in trimmed.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let index: usize = match token.parse() {
            Ok(i) => i,
            Err(_) => {
                debug!(token, "Non-numeric rerank token, discarding response");
                return None;
            }
        };
        if index == 0 || index > candidate_count {
            debug!(index, candidate_count, "Out-of-range rerank index, discarding response");
            return None;
        }
        let zero_based = index - 1;
        if !selected.contains(&zero_based) {
            selected.push(zero_based);
        }
        if selected.len() == limit {
            break;
        }
    }

    if selected.is_empty() {
        None
    } else {
        Some(selected)
    }
}

/// Build the numbered candidate list prompt for the ranking provider.
pub fn build_prompt(query: &str, candidates: &[(String, String, f32)], limit: usize) -> String {
    let mut prompt = format!(
        "You are ranking knowledge snippets by relevance to a question.\n\
         Question: {query}\n\nCandidates:\n"
    );
    for (i, (summary, platform, similarity)) in candidates.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. [{}] (similarity {:.2}) {}\n",
            i + 1,
            platform,
            similarity,
            summary
        ));
    }
    prompt.push_str(&format!(
        "\nReply with the numbers of the {limit} most relevant candidates, \
         most relevant first, comma-separated. Reply with numbers only."
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_selection() {
        assert_eq!(parse_selection("2, 1, 4", 5, 3), Some(vec![1, 0, 3]));
    }

    #[test]
    fn test_parse_truncates_to_limit() {
        assert_eq!(parse_selection("1,2,3,4,5", 5, 3), Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_parse_dedupes() {
        assert_eq!(parse_selection("2,2,1", 5, 3), Some(vec![1, 0]));
    }

    #[test]
    fn test_empty_response_rejected() {
        assert_eq!(parse_selection("   ", 5, 3), None);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(parse_selection("1, 9", 5, 3), None);
        assert_eq!(parse_selection("0", 5, 3), None);
    }

    #[test]
    fn test_prose_rejected() {
        assert_eq!(parse_selection("the best ones are 1 and 2", 5, 3), None);
    }

    #[test]
    fn test_prompt_numbers_candidates() {
        let candidates = vec![
            ("deploy pipeline broke".to_string(), "slack".to_string(), 0.91),
            ("billing question".to_string(), "jira".to_string(), 0.42),
        ];
        let prompt = build_prompt("why did deploy fail?", &candidates, 3);
        assert!(prompt.contains("1. [slack]"));
        assert!(prompt.contains("2. [jira]"));
        assert!(prompt.contains("why did deploy fail?"));
    }
}
