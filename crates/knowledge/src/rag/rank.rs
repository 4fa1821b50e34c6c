//! Link ranking for presentation.

use crate::types::CandidateLink;

/// Maximum number of links shown with an answer.
pub const MAX_RANKED_LINKS: usize = 5;

/// Order links by relevance (highest first) and keep the top five.
///
/// The sort is stable: links with equal relevance keep their input order.
pub fn rank(mut links: Vec<CandidateLink>) -> Vec<CandidateLink> {
    links.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    links.truncate(MAX_RANKED_LINKS);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str, relevance: f32) -> CandidateLink {
        CandidateLink {
            title: "Course Material".to_string(),
            url: url.to_string(),
            relevance,
        }
    }

    #[test]
    fn test_rank_empty_and_single() {
        assert!(rank(Vec::new()).is_empty());

        let ranked = rank(vec![link("https://example.com/a", 0.4)]);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_rank_orders_descending() {
        let ranked = rank(vec![
            link("https://example.com/low", 0.1),
            link("https://example.com/high", 1.0),
            link("https://example.com/mid", 0.5),
        ]);
        let urls: Vec<&str> = ranked.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://example.com/high", "https://example.com/mid", "https://example.com/low"]
        );
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let ranked = rank(vec![
            link("https://example.com/1", 0.3),
            link("https://example.com/2", 0.7),
            link("https://example.com/3", 0.3),
            link("https://example.com/4", 0.7),
        ]);
        let urls: Vec<&str> = ranked.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/2",
                "https://example.com/4",
                "https://example.com/1",
                "https://example.com/3"
            ]
        );
    }

    #[test]
    fn test_rank_truncates_and_stays_sorted() {
        let links: Vec<CandidateLink> = (0..12)
            .map(|i| link(&format!("https://example.com/{}", i), (i % 4) as f32 / 4.0))
            .collect();

        let ranked = rank(links);
        assert_eq!(ranked.len(), MAX_RANKED_LINKS);
        assert!(ranked.windows(2).all(|w| w[0].relevance >= w[1].relevance));
    }
}
