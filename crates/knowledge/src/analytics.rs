//! Question/answer analytics.
//!
//! The answering pipeline never writes; the CLI records one row per answered
//! question after the pipeline returns.

use crate::types::{AnswerResult, AnswerSource, CandidateLink};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tutor_core::{AppError, AppResult};

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub links: Vec<CandidateLink>,
    pub has_image: bool,
    pub source: AnswerSource,
    pub response_time_secs: f64,
    pub created_at: DateTime<Utc>,
}

impl QaRecord {
    /// Build a record for a pipeline answer, stamped now.
    pub fn from_answer(question: &str, result: &AnswerResult, has_image: bool, response_time_secs: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question: question.to_string(),
            answer: result.answer.clone(),
            links: result.links.clone(),
            has_image,
            source: result.source,
            response_time_secs,
            created_at: Utc::now(),
        }
    }
}

/// Aggregate figures over all recorded questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsStats {
    pub total_questions: u32,
    pub questions_with_images: u32,
    pub average_response_time_secs: f64,
}

impl AnalyticsStats {
    /// Average response time rounded to two decimals.
    pub fn average_response_time_rounded(&self) -> f64 {
        (self.average_response_time_secs * 100.0).round() / 100.0
    }
}

/// Persist a question/answer record.
pub fn insert_qa_record(conn: &Connection, record: &QaRecord) -> AppResult<()> {
    let links = serde_json::to_string(&record.links)?;

    conn.execute(
        "INSERT INTO question_answers (id, question, answer, links, has_image, source, response_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id,
            record.question,
            record.answer,
            links,
            record.has_image,
            record.source.as_str(),
            record.response_time_secs,
            record.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| AppError::Store(format!("Failed to insert analytics record: {}", e)))?;

    tracing::debug!(id = %record.id, source = record.source.as_str(), "Recorded question");
    Ok(())
}

/// Compute aggregate statistics.
pub fn qa_stats(conn: &Connection) -> AppResult<AnalyticsStats> {
    conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(has_image), 0), COALESCE(AVG(response_time), 0.0)
         FROM question_answers",
        [],
        |row| {
            Ok(AnalyticsStats {
                total_questions: row.get::<_, i64>(0)? as u32,
                questions_with_images: row.get::<_, i64>(1)? as u32,
                average_response_time_secs: row.get(2)?,
            })
        },
    )
    .map_err(|e| AppError::Store(format!("Failed to compute analytics: {}", e)))
}

/// Delete every analytics record. Content is kept.
pub fn reset_analytics(conn: &Connection) -> AppResult<()> {
    conn.execute("DELETE FROM question_answers", [])
        .map_err(|e| AppError::Store(format!("Failed to delete analytics: {}", e)))?;

    tracing::info!("Reset analytics");
    Ok(())
}
