//! End-to-end answering scenarios against stub collaborators.

use crate::config::PipelineConfig;
use crate::events::{PipelineEvent, RecordingSink};
use crate::index::{insert_content, SqliteStore};
use crate::rag::fallback::{FATAL_ERROR_MESSAGE, NO_INFORMATION_MESSAGE};
use crate::rag::AnswerPipeline;
use crate::seed::sample_content;
use crate::store::{ContentStore, MemoryStore};
use crate::types::{AnswerSource, ContentKind, ContentRecord};
use std::sync::Arc;
use std::time::Duration;
use tutor_core::{AppError, AppResult};
use tutor_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};

#[cfg(test)]
mod tests {
    use super::*;

    struct SucceedingClient;

    #[async_trait::async_trait]
    impl LlmClient for SucceedingClient {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            Ok(LlmResponse {
                content: "Machine learning lets systems learn from data.".to_string(),
                model: request.model.clone(),
                usage: LlmUsage::new(120, 12),
            })
        }
    }

    struct FailingClient;

    #[async_trait::async_trait]
    impl LlmClient for FailingClient {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            Err(AppError::Llm("401 Unauthorized: invalid api key".to_string()))
        }
    }

    struct SlowClient;

    #[async_trait::async_trait]
    impl LlmClient for SlowClient {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Err(AppError::Llm("unreachable".to_string()))
        }
    }

    struct PanickingStore;

    #[async_trait::async_trait]
    impl ContentStore for PanickingStore {
        async fn list_all_content(&self) -> AppResult<Vec<Arc<ContentRecord>>> {
            panic!("store invariant broken")
        }
    }

    fn course_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new(sample_content()))
    }

    fn many_hits_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new(
            (0..9)
                .map(|i| {
                    ContentRecord::new(
                        None,
                        "gradient ".repeat(i + 1),
                        format!("https://example.com/gradient/{}", i),
                        ContentKind::Course,
                    )
                })
                .collect(),
        ))
    }

    fn search_only(store: Arc<dyn ContentStore>, sink: Arc<RecordingSink>) -> AnswerPipeline {
        AnswerPipeline::new(store, PipelineConfig::default()).with_events(sink)
    }

    #[tokio::test]
    async fn test_scenario_a_hits_fallback() {
        let sink = Arc::new(RecordingSink::new());
        let pipeline = search_only(course_store(), sink.clone());

        let result = pipeline.answer("What is machine learning?", None).await;

        assert_eq!(result.source, AnswerSource::HitsFallback);
        assert!(result
            .answer
            .contains("Machine learning is a subset of artificial intelligence"));
        assert!(result.answer.ends_with("Please refer to the linked materials for more detailed information."));
        // "is" also matches "analysis" and "interdisciplinary", so every sample record hits
        assert_eq!(result.links.len(), 3);
        assert!(result
            .links
            .iter()
            .any(|l| l.title == "Machine Learning Basics" && l.url == "https://example.com/ml-basics"));

        let events = sink.events();
        assert!(matches!(
            events.first(),
            Some(PipelineEvent::StrategySelected {
                strategy: "no_external_service"
            })
        ));
        assert!(events.iter().any(|e| matches!(
            e,
            PipelineEvent::RetrievalCompleted { top_score: Some(score), .. } if *score > 0
        )));
    }

    #[tokio::test]
    async fn test_scenario_b_empty_store() {
        let pipeline = search_only(Arc::new(MemoryStore::default()), Arc::new(RecordingSink::new()));

        let result = pipeline.answer("What is machine learning?", None).await;

        assert_eq!(result.source, AnswerSource::NoHitsFallback);
        assert_eq!(result.answer, NO_INFORMATION_MESSAGE);
        assert!(result.links.is_empty());
    }

    #[tokio::test]
    async fn test_zero_overlap_is_no_hits() {
        let pipeline = search_only(course_store(), Arc::new(RecordingSink::new()));

        let result = pipeline.answer("kubernetes", None).await;
        assert_eq!(result.source, AnswerSource::NoHitsFallback);
        assert!(result.links.is_empty());
    }

    #[tokio::test]
    async fn test_scenario_c_augmented() {
        let sink = Arc::new(RecordingSink::new());
        let pipeline = AnswerPipeline::new(many_hits_store(), PipelineConfig::default())
            .with_generator(Arc::new(SucceedingClient), "gpt-4o-mini")
            .with_events(sink.clone());

        let result = pipeline.answer("gradient", None).await;

        assert_eq!(result.source, AnswerSource::Augmented);
        assert_eq!(result.answer, "Machine learning lets systems learn from data.");
        assert_eq!(result.links.len(), 5);
        assert!(result.links.iter().all(|l| l.url.starts_with("https://example.com/gradient/")));
        assert!(result.links.windows(2).all(|w| w[0].relevance >= w[1].relevance));
        assert!(sink.events().iter().any(|e| matches!(
            e,
            PipelineEvent::GenerationSucceeded { completion_tokens: 12, .. }
        )));
    }

    #[tokio::test]
    async fn test_scenario_d_generation_failure_matches_fallback() {
        let question = "What is machine learning?";
        let search_only_result = search_only(course_store(), Arc::new(RecordingSink::new()))
            .answer(question, None)
            .await;

        let failed = AnswerPipeline::new(course_store(), PipelineConfig::default())
            .with_generator(Arc::new(FailingClient), "gpt-4o-mini")
            .with_events(Arc::new(RecordingSink::new()))
            .answer(question, None)
            .await;

        assert_eq!(failed.source, AnswerSource::AugmentedFailedFallback);
        assert_eq!(failed.answer, search_only_result.answer);
        assert_eq!(failed.links, search_only_result.links);
    }

    #[tokio::test]
    async fn test_scenario_d_with_empty_store() {
        let failed = AnswerPipeline::new(Arc::new(MemoryStore::default()), PipelineConfig::default())
            .with_generator(Arc::new(FailingClient), "gpt-4o-mini")
            .with_events(Arc::new(RecordingSink::new()))
            .answer("anything", None)
            .await;

        assert_eq!(failed.source, AnswerSource::AugmentedFailedFallback);
        assert_eq!(failed.answer, NO_INFORMATION_MESSAGE);
        assert!(failed.links.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_timeout_falls_back() {
        let config = PipelineConfig {
            generation_timeout_secs: 5,
            ..Default::default()
        };
        let sink = Arc::new(RecordingSink::new());
        let result = AnswerPipeline::new(course_store(), config)
            .with_generator(Arc::new(SlowClient), "gpt-4o-mini")
            .with_events(sink.clone())
            .answer("python pandas", None)
            .await;

        assert_eq!(result.source, AnswerSource::AugmentedFailedFallback);
        assert!(sink.events().iter().any(|e| matches!(
            e,
            PipelineEvent::GenerationFailed { error, .. } if error.contains("timed out")
        )));
    }

    #[tokio::test]
    async fn test_panicking_store_is_fatal() {
        let sink = Arc::new(RecordingSink::new());
        let result = search_only(Arc::new(PanickingStore), sink.clone())
            .answer("anything", None)
            .await;

        assert_eq!(result.source, AnswerSource::FatalError);
        assert_eq!(result.answer, FATAL_ERROR_MESSAGE);
        assert!(result.links.is_empty());
        assert!(matches!(
            sink.events().last(),
            Some(PipelineEvent::AnswerComposed {
                source: AnswerSource::FatalError,
                links: 0
            })
        ));
    }

    #[tokio::test]
    async fn test_answers_from_sqlite_store() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("content.sqlite")).unwrap();
        store
            .with_connection(|conn| {
                for record in sample_content() {
                    insert_content(conn, &record)?;
                }
                Ok(())
            })
            .unwrap();

        let result = search_only(Arc::new(store), Arc::new(RecordingSink::new()))
            .answer("numpy matplotlib", None)
            .await;

        assert_eq!(result.source, AnswerSource::HitsFallback);
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.links[0].url, "https://example.com/python-data");
    }

    #[tokio::test]
    async fn test_fallback_links_follow_excerpts() {
        let result = search_only(many_hits_store(), Arc::new(RecordingSink::new()))
            .answer("gradient", None)
            .await;

        assert_eq!(result.source, AnswerSource::HitsFallback);
        let urls: Vec<&str> = result.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/gradient/8",
                "https://example.com/gradient/7",
                "https://example.com/gradient/6"
            ]
        );
        assert!(result.links.iter().all(|l| (0.0..=1.0).contains(&l.relevance)));
        assert!(result.links.windows(2).all(|w| w[0].relevance >= w[1].relevance));
    }

    #[tokio::test]
    async fn test_fallback_with_five_hits_returns_three_links() {
        let store = Arc::new(MemoryStore::new(
            (0..5)
                .map(|i| {
                    ContentRecord::new(
                        None,
                        "tree",
                        format!("https://example.com/tree/{}", i),
                        ContentKind::Course,
                    )
                })
                .collect(),
        ));

        let result = search_only(store.clone(), Arc::new(RecordingSink::new()))
            .answer("tree", None)
            .await;
        assert_eq!(result.source, AnswerSource::HitsFallback);
        assert_eq!(result.links.len(), 3);
        assert!(result.answer.contains("3. tree"));
        assert!(!result.answer.contains("4. "));

        let failed = AnswerPipeline::new(store, PipelineConfig::default())
            .with_generator(Arc::new(FailingClient), "gpt-4o-mini")
            .with_events(Arc::new(RecordingSink::new()))
            .answer("tree", None)
            .await;
        assert_eq!(failed.source, AnswerSource::AugmentedFailedFallback);
        assert_eq!(failed.links.len(), 3);
    }

    #[tokio::test]
    async fn test_title_weight_in_ranking() {
        let store = Arc::new(MemoryStore::new(vec![
            ContentRecord::new(Some("other"), "bayes", "https://example.com/body", ContentKind::Course),
            ContentRecord::new(Some("bayes"), "other", "https://example.com/title", ContentKind::Course),
        ]));
        let result = search_only(store, Arc::new(RecordingSink::new()))
            .answer("bayes", None)
            .await;

        assert_eq!(result.links[0].url, "https://example.com/title");
        assert!((result.links[0].relevance - 2.0 * result.links[1].relevance).abs() < 1e-6);
    }
}
