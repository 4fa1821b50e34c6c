//! Content command handler.
//!
//! Manages the course content the answering pipeline searches.

use super::{open_store, print_json};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tutor_core::{config::AppConfig, AppError, AppResult};
use tutor_knowledge::{
    import::import_path,
    index::{content_count, insert_content, list_content, reset_content},
    seed::seed_if_empty,
    ContentKind, ContentRecord,
};

/// Manage stored course content
#[derive(Args, Debug)]
pub struct ContentCommand {
    #[command(subcommand)]
    pub action: ContentAction,
}

#[derive(Subcommand, Debug)]
pub enum ContentAction {
    /// Add or replace a single record
    Add(ContentAddCommand),
    /// Import records from a JSON-lines file or directory
    Import(ContentImportCommand),
    /// List stored records
    List(ContentListCommand),
    /// Insert sample course content into an empty store
    Seed,
    /// Delete all stored content
    Clear(ContentClearCommand),
}

impl ContentCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            ContentAction::Add(cmd) => cmd.execute(config),
            ContentAction::Import(cmd) => cmd.execute(config),
            ContentAction::List(cmd) => cmd.execute(config),
            ContentAction::Seed => {
                let store = open_store(config)?;
                let inserted = store.with_connection(seed_if_empty)?;
                if inserted == 0 {
                    println!("Content store already has content, nothing seeded");
                } else {
                    println!("Seeded {} sample records", inserted);
                }
                Ok(())
            }
            ContentAction::Clear(cmd) => cmd.execute(config),
        }
    }
}

/// Add or replace a single record (keyed by URL)
#[derive(Args, Debug)]
pub struct ContentAddCommand {
    /// Source URL
    #[arg(long)]
    pub url: String,

    /// Record title
    #[arg(long)]
    pub title: Option<String>,

    /// Body text
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub body: Option<String>,

    /// Read the body text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Content kind (course, discourse, other)
    #[arg(long, default_value = "course")]
    pub kind: String,
}

impl ContentAddCommand {
    fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let body = match (&self.body, &self.file) {
            (Some(body), _) => body.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map_err(|e| AppError::Config(format!("Failed to read {:?}: {}", path, e)))?,
            (None, None) => return Err(AppError::Config("No body provided".to_string())),
        };

        let record = ContentRecord::new(
            self.title.as_deref(),
            body,
            self.url.clone(),
            ContentKind::parse(&self.kind),
        );

        let store = open_store(config)?;
        store.with_connection(|conn| insert_content(conn, &record))?;

        tracing::info!(url = %record.url, kind = record.kind.as_str(), "Stored content record");
        println!("Stored {}", record.url);
        Ok(())
    }
}

/// Import JSON-lines records
#[derive(Args, Debug)]
pub struct ContentImportCommand {
    /// A `.jsonl` file, or a directory searched for `.jsonl` files
    pub path: PathBuf,
}

impl ContentImportCommand {
    fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = open_store(config)?;
        let stats = store.with_connection(|conn| import_path(conn, &self.path))?;

        println!(
            "Imported {} records from {} files ({} skipped)",
            stats.imported, stats.files, stats.skipped
        );
        Ok(())
    }
}

/// List stored records
#[derive(Args, Debug)]
pub struct ContentListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ContentListCommand {
    fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = open_store(config)?;
        let records = store.with_connection(list_content)?;

        if self.json {
            return print_json(&serde_json::json!(records));
        }

        if records.is_empty() {
            println!("No content stored. Run 'tutor content seed' or 'tutor content import'.");
            return Ok(());
        }

        for record in &records {
            println!("[{}] {} <{}>", record.kind.as_str(), record.display_title(), record.url);
        }
        println!("{} records", records.len());
        Ok(())
    }
}

/// Delete all stored content
#[derive(Args, Debug)]
pub struct ContentClearCommand {
    /// Confirm deletion
    #[arg(short, long)]
    pub yes: bool,
}

impl ContentClearCommand {
    fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = open_store(config)?;
        let count = store.with_connection(content_count)?;

        if !self.yes {
            println!("This deletes {} records. Re-run with --yes to confirm.", count);
            return Ok(());
        }

        store.with_connection(reset_content)?;
        println!("Deleted {} records", count);
        Ok(())
    }
}
