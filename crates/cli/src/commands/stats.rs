//! Stats command handler.
//!
//! Shows aggregate question analytics.

use super::{open_store, print_json};
use clap::Args;
use tutor_core::{config::AppConfig, AppResult};
use tutor_knowledge::analytics::{qa_stats, reset_analytics};

/// Show question analytics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Reset statistics (requires confirmation)
    #[arg(long)]
    pub reset: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");
        tracing::debug!("Stats options: {:?}", self);

        let store = open_store(config)?;

        if self.reset {
            if !self.yes {
                println!("This deletes all recorded questions. Re-run with --reset --yes to confirm.");
                return Ok(());
            }
            store.with_connection(reset_analytics)?;
            println!("Statistics reset");
            return Ok(());
        }

        let stats = store.with_connection(qa_stats)?;

        if self.json {
            let output = serde_json::json!({
                "totalQuestions": stats.total_questions,
                "questionsWithImages": stats.questions_with_images,
                "averageResponseTimeSecs": stats.average_response_time_rounded(),
            });
            print_json(&output)
        } else {
            println!("Total questions:       {}", stats.total_questions);
            println!("Questions with images: {}", stats.questions_with_images);
            println!(
                "Average response time: {:.2}s",
                stats.average_response_time_rounded()
            );
            Ok(())
        }
    }
}
