//! Context composition from search hits.

use crate::config::PipelineConfig;
use crate::types::{CandidateLink, SearchHit};

/// Bullet placed in front of each context excerpt.
const CONTEXT_BULLET: &str = "- ";

/// Text context for the language model plus the candidate links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposedContext {
    /// Bulleted excerpts separated by blank lines; empty when there are no hits
    pub context: String,

    /// Links for the leading hits, in hit order
    pub links: Vec<CandidateLink>,
}

/// First `max_chars` characters of `text`, never splitting a character.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Map a raw score onto [0, 1], saturating at `divisor`.
pub fn relevance(score: u32, divisor: f32) -> f32 {
    (score as f32 / divisor).clamp(0.0, 1.0)
}

/// Build the context string and candidate links from ordered hits.
pub fn compose(hits: &[SearchHit], config: &PipelineConfig) -> ComposedContext {
    let context = hits
        .iter()
        .take(config.context_hits)
        .map(|hit| {
            format!(
                "{}{}",
                CONTEXT_BULLET,
                excerpt(&hit.record.body, config.context_excerpt_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let links = hits
        .iter()
        .take(config.max_links)
        .map(|hit| CandidateLink {
            title: hit.record.display_title().to_string(),
            url: hit.record.url.clone(),
            relevance: relevance(hit.score, config.relevance_divisor),
        })
        .collect();

    ComposedContext { context, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentKind, ContentRecord, PLACEHOLDER_TITLE};
    use std::sync::Arc;

    fn hit(title: Option<&str>, body: &str, url: &str, score: u32) -> SearchHit {
        SearchHit {
            record: Arc::new(ContentRecord::new(title, body, url, ContentKind::Course)),
            score,
        }
    }

    #[test]
    fn test_empty_hits() {
        let composed = compose(&[], &PipelineConfig::default());
        assert_eq!(composed.context, "");
        assert!(composed.links.is_empty());
    }

    #[test]
    fn test_context_uses_first_three_hits() {
        let hits: Vec<SearchHit> = (1..=4)
            .map(|i| hit(Some("T"), &format!("body {}", i), &format!("https://example.com/{}", i), 1))
            .collect();

        let composed = compose(&hits, &PipelineConfig::default());
        assert_eq!(composed.context, "- body 1\n\n- body 2\n\n- body 3");
        assert_eq!(composed.links.len(), 4);
    }

    #[test]
    fn test_links_capped_at_five() {
        let hits: Vec<SearchHit> = (0..7)
            .map(|i| hit(None, "x", &format!("https://example.com/{}", i), 1))
            .collect();
        assert_eq!(compose(&hits, &PipelineConfig::default()).links.len(), 5);
    }

    #[test]
    fn test_context_excerpt_is_truncated() {
        let long_body = "a".repeat(500);
        let composed = compose(&[hit(None, &long_body, "https://example.com/a", 1)], &PipelineConfig::default());
        assert_eq!(composed.context.chars().count(), CONTEXT_BULLET.len() + 300);
    }

    #[test]
    fn test_link_title_placeholder_and_url() {
        let composed = compose(&[hit(None, "x", "https://example.com/untitled", 3)], &PipelineConfig::default());
        assert_eq!(composed.links[0].title, PLACEHOLDER_TITLE);
        assert_eq!(composed.links[0].url, "https://example.com/untitled");
        assert!((composed.links[0].relevance - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_relevance_saturates() {
        assert_eq!(relevance(0, 10.0), 0.0);
        assert!((relevance(5, 10.0) - 0.5).abs() < 1e-6);
        assert_eq!(relevance(10, 10.0), 1.0);
        assert_eq!(relevance(250, 10.0), 1.0);
        assert_eq!(relevance(u32::MAX, 10.0), 1.0);
    }

    #[test]
    fn test_relevance_always_in_unit_interval() {
        for score in 0..200 {
            let r = relevance(score, 10.0);
            assert!((0.0..=1.0).contains(&r), "score {} gave {}", score, r);
        }
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo wörld", 4), "héll");
        assert_eq!(excerpt("short", 300), "short");
        assert_eq!(excerpt("", 10), "");
    }
}
