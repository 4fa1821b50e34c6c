//! Deterministic answers composed straight from search results.

use crate::rag::context::excerpt;
use crate::types::SearchHit;

/// Answer used when no stored content matches the question.
pub const NO_INFORMATION_MESSAGE: &str = "I couldn't find specific information about your question in the available course materials. Please try rephrasing your question or contact your instructor for assistance.";

/// Answer used when the pipeline fails unexpectedly.
pub const FATAL_ERROR_MESSAGE: &str = "I'm sorry, but I'm experiencing technical difficulties. Please try again later or contact your instructor for assistance.";

const FALLBACK_HEADER: &str = "Based on the available course materials:";
const FALLBACK_FOOTER: &str = "Please refer to the linked materials for more detailed information.";

/// Compose a search-only answer.
///
/// The header, one `N. excerpt...` line per hit and the footer are joined by
/// newlines; the header and footer carry their own blank lines, so each is
/// set off by two empty lines. Every excerpt ends in `...`, cut or not.
///
/// Returns `None` when there are no hits; the caller answers with
/// [`NO_INFORMATION_MESSAGE`].
pub fn compose_fallback(hits: &[SearchHit], max_excerpts: usize, excerpt_chars: usize) -> Option<String> {
    if hits.is_empty() {
        return None;
    }

    let mut parts = Vec::with_capacity(max_excerpts + 2);
    parts.push(format!("{}\n\n", FALLBACK_HEADER));
    for (i, hit) in hits.iter().take(max_excerpts).enumerate() {
        parts.push(format!("{}. {}...", i + 1, excerpt(&hit.record.body, excerpt_chars)));
    }
    parts.push(format!("\n\n{}", FALLBACK_FOOTER));

    Some(parts.join("\n"))
}
