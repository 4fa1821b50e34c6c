//! Answering pipeline type definitions.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Display title used for links whose source record has no title.
pub const PLACEHOLDER_TITLE: &str = "Course Material";

/// Category of a stored content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Official course material
    #[default]
    Course,
    /// Forum or discussion post
    Discourse,
    /// Anything else
    Other,
}

impl ContentKind {
    /// Parse a kind from its stored name; unknown names map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "course" => Self::Course,
            "discourse" | "discussion" => Self::Discourse,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Discourse => "discourse",
            Self::Other => "other",
        }
    }
}

/// A piece of previously ingested course content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Short title, if the source had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Text content
    #[serde(alias = "content")]
    pub body: String,

    /// Source locator
    pub url: String,

    /// Content category
    #[serde(default, alias = "content_type")]
    pub kind: ContentKind,
}

impl ContentRecord {
    pub fn new(title: Option<&str>, body: impl Into<String>, url: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            title: title.map(str::to_string),
            body: body.into(),
            url: url.into(),
            kind,
        }
    }

    /// Title shown to users, falling back to the placeholder.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(PLACEHOLDER_TITLE)
    }
}

/// A scored retrieval result for one query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched record (shared, read-only)
    pub record: Arc<ContentRecord>,

    /// Keyword score; always greater than zero for returned hits
    pub score: u32,
}

/// A link offered to the student alongside the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLink {
    /// Display title
    pub title: String,

    /// Source URL
    pub url: String,

    /// Relevance in [0, 1]
    pub relevance: f32,
}

/// Which strategy produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Generated by the language model from retrieved context
    Augmented,
    /// The language model call failed; answer composed from search results
    AugmentedFailedFallback,
    /// No generation service and no matching content
    NoHitsFallback,
    /// No generation service; answer composed from search results
    HitsFallback,
    /// Unexpected internal failure; fixed apology
    FatalError,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Augmented => "augmented",
            Self::AugmentedFailedFallback => "augmented_failed_fallback",
            Self::NoHitsFallback => "no_hits_fallback",
            Self::HitsFallback => "hits_fallback",
            Self::FatalError => "fatal_error",
        }
    }
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline's answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Answer text (never empty)
    pub answer: String,

    /// Ranked links, at most five
    pub links: Vec<CandidateLink>,

    /// Provenance tag
    pub source: AnswerSource,
}
