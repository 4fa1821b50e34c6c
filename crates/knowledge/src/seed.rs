//! Sample course content for an empty store.

use crate::index::{content_count, insert_content};
use crate::types::{ContentKind, ContentRecord};
use rusqlite::Connection;
use tutor_core::AppResult;

/// The sample records inserted by [`seed_if_empty`].
pub fn sample_content() -> Vec<ContentRecord> {
    vec![
        ContentRecord::new(
            Some("Introduction to Data Science"),
            "Data science is an interdisciplinary field that uses scientific methods, processes, algorithms and systems to extract knowledge and insights from structured and unstructured data.",
            "https://example.com/intro-ds",
            ContentKind::Course,
        ),
        ContentRecord::new(
            Some("Machine Learning Basics"),
            "Machine learning is a subset of artificial intelligence that provides systems the ability to automatically learn and improve from experience without being explicitly programmed.",
            "https://example.com/ml-basics",
            ContentKind::Course,
        ),
        ContentRecord::new(
            Some("Python for Data Analysis"),
            "Python is a powerful programming language for data analysis. Key libraries include pandas for data manipulation, numpy for numerical computing, and matplotlib for visualization.",
            "https://example.com/python-data",
            ContentKind::Course,
        ),
    ]
}

/// Insert the sample records if the store is empty.
///
/// Returns the number of records inserted (zero when content already exists).
pub fn seed_if_empty(conn: &Connection) -> AppResult<u32> {
    let existing = content_count(conn)?;
    if existing > 0 {
        tracing::debug!(existing, "Content store not empty, skipping seed");
        return Ok(0);
    }

    let records = sample_content();
    for record in &records {
        insert_content(conn, record)?;
    }

    tracing::info!(records = records.len(), "Seeded sample course content");
    Ok(records.len() as u32)
}
