//! Ask command handler.
//!
//! Validates the question, runs the answering pipeline and records analytics.

use super::{open_store, print_json};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tutor_core::{
    config::{AppConfig, ProviderConfig},
    AppError, AppResult,
};
use tutor_knowledge::{
    analytics::{insert_qa_record, QaRecord},
    config::load_config,
    AnswerPipeline, AnswerResult,
};
use tutor_llm::{create_client, ImageAttachment};

/// Answer a course question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Attach an image file
    #[arg(long, conflicts_with = "image_base64")]
    pub image: Option<PathBuf>,

    /// Attach a base64-encoded image
    #[arg(long)]
    pub image_base64: Option<String>,

    /// Maximum number of search hits to use
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Answer from search results only, even if a provider is configured
    #[arg(long)]
    pub no_llm: bool,

    /// Do not record this question in analytics
    #[arg(long)]
    pub no_record: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let question = self.get_question()?;
        let image = self.load_image()?;

        let mut pipeline_config = load_config(&config.workspace)?;
        if let Some(top_k) = self.top_k {
            pipeline_config.top_k = top_k;
        }
        pipeline_config.validate()?;

        let store = open_store(config)?;
        let mut pipeline = AnswerPipeline::new(Arc::new(store.clone()), pipeline_config);

        if self.no_llm {
            tracing::info!("Generation disabled by --no-llm");
        } else if config.generation_enabled() {
            let endpoint = config.resolve_endpoint();
            let api_key = config.resolve_api_key(&config.provider);
            let client = create_client(
                &config.provider,
                endpoint.as_deref(),
                api_key.as_deref(),
                provider_timeout(config),
            )
            .map_err(AppError::Config)?;
            pipeline = pipeline.with_generator(client, config.model.clone());
        } else {
            tracing::info!(
                "No generation service configured for provider '{}', answering from search results",
                config.provider
            );
        }

        let start = Instant::now();
        let result = pipeline.answer(&question, image.as_ref()).await;
        let elapsed = start.elapsed().as_secs_f64();

        if !self.no_record {
            let record = QaRecord::from_answer(&question, &result, image.is_some(), elapsed);
            if let Err(e) = store.with_connection(|conn| insert_qa_record(conn, &record)) {
                tracing::warn!("Failed to record analytics: {}", e);
            }
        }

        if self.json {
            self.print_json_result(&result, elapsed)
        } else {
            print_text_result(&result);
            Ok(())
        }
    }

    /// Get the question text from the argument or file. Empty questions are rejected.
    fn get_question(&self) -> AppResult<String> {
        let raw = match (&self.question, &self.file) {
            (Some(question), _) => question.clone(),
            (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read question file {:?}: {}", path, e))
            })?,
            (None, None) => {
                return Err(AppError::Config("No question provided".to_string()));
            }
        };

        let question = raw.trim();
        if question.is_empty() {
            return Err(AppError::Config("Question must not be empty".to_string()));
        }
        Ok(question.to_string())
    }

    /// Load the optional image attachment.
    fn load_image(&self) -> AppResult<Option<ImageAttachment>> {
        if let Some(path) = &self.image {
            let data = std::fs::read(path)?;
            let extension = path.extension().and_then(|e| e.to_str());
            let mime = ImageAttachment::mime_for_extension(extension);
            tracing::debug!("Attached image {:?} ({} bytes, {})", path, data.len(), mime);
            return Ok(Some(ImageAttachment::new(data, mime)));
        }

        match &self.image_base64 {
            Some(encoded) => Ok(Some(ImageAttachment::from_base64(encoded)?)),
            None => Ok(None),
        }
    }

    fn print_json_result(&self, result: &AnswerResult, elapsed: f64) -> AppResult<()> {
        let output = serde_json::json!({
            "answer": result.answer,
            "links": result.links,
            "source": result.source,
            "responseTimeSecs": (elapsed * 100.0).round() / 100.0,
        });
        print_json(&output)
    }
}

fn print_text_result(result: &AnswerResult) {
    println!("{}", result.answer);

    if !result.links.is_empty() {
        println!();
        println!("Links:");
        for link in &result.links {
            println!("  - {} <{}> ({:.2})", link.title, link.url, link.relevance);
        }
    }

    tracing::debug!("Answer source: {}", result.source);
}

/// Request timeout configured for the active provider, if any.
fn provider_timeout(config: &AppConfig) -> Option<Duration> {
    match config.get_provider_config(&config.provider) {
        Some(ProviderConfig::Ollama {
            timeout: Some(secs), ..
        }) => Some(Duration::from_secs(*secs)),
        _ => None,
    }
}
