//! Keyword retrieval over stored content.
//!
//! Scoring is a plain occurrence count: every lower-cased, whitespace-split
//! question token is counted in the lower-cased body, and counted twice over
//! in the lower-cased title. No stemming, no stop words.

use crate::events::{EventSink, PipelineEvent};
use crate::store::ContentStore;
use crate::types::{ContentRecord, SearchHit};
use std::sync::Arc;
use std::time::Duration;
use tutor_core::{AppError, AppResult};

/// Weight of a keyword occurrence in the title relative to the body.
pub const TITLE_WEIGHT: u32 = 2;

/// Split a question into lower-cased whitespace-delimited keywords.
pub fn tokenize(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Score one record against a keyword set.
pub fn score_record(record: &ContentRecord, keywords: &[String]) -> u32 {
    let body = record.body.to_lowercase();
    let title = record
        .title
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    keywords
        .iter()
        .map(|keyword| {
            let body_hits = body.matches(keyword.as_str()).count() as u32;
            let title_hits = title.matches(keyword.as_str()).count() as u32;
            body_hits + TITLE_WEIGHT * title_hits
        })
        .sum()
}

/// Score, filter, order and truncate records.
///
/// Zero-score records are dropped. Equal scores keep their store order.
pub fn rank_records(
    records: Vec<Arc<ContentRecord>>,
    keywords: &[String],
    top_k: usize,
) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = records
        .into_iter()
        .filter_map(|record| {
            let score = score_record(&record, keywords);
            (score > 0).then_some(SearchHit { record, score })
        })
        .collect();

    // Vec::sort_by is stable
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(top_k);
    hits
}

/// Keyword retriever over an injected content store.
#[derive(Clone)]
pub struct KeywordRetriever {
    store: Arc<dyn ContentStore>,
    events: Arc<dyn EventSink>,
    timeout: Duration,
}

impl KeywordRetriever {
    pub fn new(store: Arc<dyn ContentStore>, events: Arc<dyn EventSink>, timeout: Duration) -> Self {
        Self {
            store,
            events,
            timeout,
        }
    }

    /// Retrieve the `top_k` best hits for a question.
    ///
    /// Never fails: a store error or timeout is reported to the event sink and
    /// yields an empty result.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Vec<SearchHit> {
        match self.try_retrieve(question, top_k).await {
            Ok(hits) => hits,
            Err(e) => {
                self.events.emit(PipelineEvent::StoreUnavailable {
                    error: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Like [`retrieve`](Self::retrieve) but surfaces store failures.
    pub async fn try_retrieve(&self, question: &str, top_k: usize) -> AppResult<Vec<SearchHit>> {
        let keywords = tokenize(question);

        let records = tokio::time::timeout(self.timeout, self.store.list_all_content())
            .await
            .map_err(|_| {
                AppError::Store(format!(
                    "Content store did not answer within {:.1}s",
                    self.timeout.as_secs_f64()
                ))
            })??;

        let records_scanned = records.len();
        let hits = rank_records(records, &keywords, top_k);

        self.events.emit(PipelineEvent::RetrievalCompleted {
            keywords: keywords.len(),
            records_scanned,
            hits: hits.len(),
            top_score: hits.first().map(|hit| hit.score),
        });

        Ok(hits)
    }
}
