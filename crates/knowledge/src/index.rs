//! SQLite-backed content store.
//!
//! Holds ingested content records and the question/answer analytics table.
//! Records are keyed by URL; re-ingesting a URL replaces its content in place.

use crate::store::ContentStore;
use crate::types::{ContentKind, ContentRecord};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tutor_core::{AppError, AppResult};

/// Initialize the SQLite database.
pub fn init_index(db_path: &Path) -> AppResult<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Store(format!("Failed to create index directory: {}", e)))?;
    }

    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Store(format!("Failed to open SQLite index: {}", e)))?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS content (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL UNIQUE,
            title TEXT,
            body TEXT NOT NULL,
            kind TEXT NOT NULL,
            ingested_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS question_answers (
            id TEXT PRIMARY KEY,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            links TEXT NOT NULL,
            has_image INTEGER NOT NULL,
            source TEXT NOT NULL,
            response_time REAL NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_qa_created ON question_answers(created_at);
        "#,
    )
    .map_err(|e| AppError::Store(format!("Failed to create tables: {}", e)))?;

    tracing::debug!("Initialized SQLite index at {:?}", db_path);
    Ok(conn)
}

/// Insert a record, replacing the body/title/kind of an existing record with the same URL.
pub fn insert_content(conn: &Connection, record: &ContentRecord) -> AppResult<()> {
    if record.body.trim().is_empty() {
        return Err(AppError::Store(format!(
            "Refusing to store empty content for {}",
            record.url
        )));
    }

    conn.execute(
        "INSERT INTO content (url, title, body, kind, ingested_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(url) DO UPDATE SET
            title = excluded.title,
            body = excluded.body,
            kind = excluded.kind,
            ingested_at = excluded.ingested_at",
        params![
            record.url,
            record.title,
            record.body,
            record.kind.as_str(),
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| AppError::Store(format!("Failed to insert content: {}", e)))?;

    Ok(())
}

/// List every record in ingestion order.
pub fn list_content(conn: &Connection) -> AppResult<Vec<ContentRecord>> {
    let mut stmt = conn
        .prepare("SELECT title, body, url, kind FROM content ORDER BY id")
        .map_err(|e| AppError::Store(format!("Failed to prepare query: {}", e)))?;

    let rows = stmt
        .query_map([], |row| {
            let kind: String = row.get(3)?;
            Ok(ContentRecord {
                title: row.get(0)?,
                body: row.get(1)?,
                url: row.get(2)?,
                kind: ContentKind::parse(&kind),
            })
        })
        .map_err(|e| AppError::Store(format!("Failed to query content: {}", e)))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Store(format!("Failed to read content row: {}", e)))
}

/// Count stored records.
pub fn content_count(conn: &Connection) -> AppResult<u32> {
    conn.query_row("SELECT COUNT(*) FROM content", [], |row| {
        row.get::<_, i64>(0).map(|v| v as u32)
    })
    .map_err(|e| AppError::Store(format!("Failed to count content: {}", e)))
}

/// Delete all stored content. Analytics are kept.
pub fn reset_content(conn: &Connection) -> AppResult<()> {
    conn.execute("DELETE FROM content", [])
        .map_err(|e| AppError::Store(format!("Failed to delete content: {}", e)))?;

    tracing::info!("Reset content store");
    Ok(())
}

/// [`ContentStore`] over a SQLite database.
///
/// The connection sits behind a mutex and queries run on the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (and create if needed) the database at `db_path`.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        Ok(Self::from_connection(init_index(db_path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run a closure against the connection on the current thread.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Store("SQLite connection lock poisoned".to_string()))?;
        f(&conn)
    }
}

#[async_trait::async_trait]
impl ContentStore for SqliteStore {
    async fn list_all_content(&self) -> AppResult<Vec<Arc<ContentRecord>>> {
        let store = self.clone();
        let records = tokio::task::spawn_blocking(move || store.with_connection(list_content))
            .await
            .map_err(|e| AppError::Store(format!("Content query task failed: {}", e)))??;

        Ok(records.into_iter().map(Arc::new).collect())
    }
}
