//! Command handlers for the tutor CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod content;
pub mod health;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use content::ContentCommand;
pub use health::HealthCommand;
pub use stats::StatsCommand;

use tutor_core::{config::AppConfig, AppResult};
use tutor_knowledge::{config::get_index_path, SqliteStore};

/// Open the workspace content database, creating it if needed.
pub fn open_store(config: &AppConfig) -> AppResult<SqliteStore> {
    let path = get_index_path(&config.workspace);
    tracing::debug!("Opening content store at {:?}", path);
    SqliteStore::open(&path)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json(value: &serde_json::Value) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| tutor_core::AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
