//! JSON-lines content import.
//!
//! Each non-blank line is one [`ContentRecord`] object, e.g.
//! `{"title": "...", "content": "...", "url": "...", "content_type": "course"}`.
//! `body`/`kind` are accepted in place of `content`/`content_type`.

use crate::index::insert_content;
use crate::types::ContentRecord;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tutor_core::{AppError, AppResult};
use walkdir::WalkDir;

/// Totals for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub files: u32,
    pub imported: u32,
    pub skipped: u32,
}

/// Parse JSON-lines text. Blank lines are ignored.
pub fn parse_jsonl(text: &str) -> AppResult<Vec<ContentRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<ContentRecord>(line).map_err(|e| {
                AppError::Serialization(format!("Invalid record on line {}: {}", i + 1, e))
            })
        })
        .collect()
}

/// The `.jsonl` files to import from `path`: the file itself, or every
/// `.jsonl` file below a directory in sorted order.
pub fn collect_files(path: &Path) -> AppResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(AppError::Config(format!("Import path not found: {:?}", path)));
    }

    let files = WalkDir::new(path)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("jsonl"))
        .collect();

    Ok(files)
}

/// Import every record found at `path` into the store.
///
/// Records with an empty body are skipped with a warning; a malformed line
/// aborts the import of its file.
pub fn import_path(conn: &Connection, path: &Path) -> AppResult<ImportStats> {
    let mut stats = ImportStats::default();

    for file in collect_files(path)? {
        let text = fs::read_to_string(&file)
            .map_err(|e| AppError::Config(format!("Failed to read {:?}: {}", file, e)))?;
        let records = parse_jsonl(&text)
            .map_err(|e| AppError::Serialization(format!("{:?}: {}", file, e)))?;

        stats.files += 1;
        for record in &records {
            match insert_content(conn, record) {
                Ok(()) => stats.imported += 1,
                Err(e) => {
                    tracing::warn!(url = %record.url, error = %e, "Skipping record");
                    stats.skipped += 1;
                }
            }
        }
        tracing::debug!(file = ?file, records = records.len(), "Imported file");
    }

    tracing::info!(
        files = stats.files,
        imported = stats.imported,
        skipped = stats.skipped,
        "Import completed"
    );
    Ok(stats)
}
