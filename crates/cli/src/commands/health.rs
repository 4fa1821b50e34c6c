//! Health command handler.
//!
//! Reports configuration capabilities without contacting any service.

use super::{open_store, print_json};
use clap::Args;
use tutor_core::{config::AppConfig, AppResult};
use tutor_knowledge::{config::load_config, index::content_count};

/// Show configuration and store status
#[derive(Args, Debug)]
pub struct HealthCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HealthCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let pipeline_config = load_config(&config.workspace)?;
        let store = open_store(config)?;
        let records = store.with_connection(content_count)?;
        let generation = config.generation_enabled();

        if self.json {
            let output = serde_json::json!({
                "status": "ok",
                "provider": config.provider,
                "model": config.model,
                "generationEnabled": generation,
                "contentRecords": records,
                "topK": pipeline_config.top_k,
            });
            return print_json(&output);
        }

        println!("Provider:           {}", config.provider);
        println!("Model:              {}", config.model);
        println!(
            "Generation:         {}",
            if generation { "enabled" } else { "disabled (search-only answers)" }
        );
        println!("Content records:    {}", records);
        println!("Top-k:              {}", pipeline_config.top_k);
        Ok(())
    }
}
