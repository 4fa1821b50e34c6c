//! OpenAI chat-completions provider.
//!
//! One request per call and no retries: the answering pipeline degrades to
//! search-only answers instead of retrying a failed generation.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tutor_core::{AppError, AppResult};

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Upper bound on how much of an error body is kept in the error message.
const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

/// Chat message content: plain text, or text plus image parts.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorObject,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorObject {
    message: Option<String>,
}

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client against the public OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> AppResult<Self> {
        Self::with_base_url(DEFAULT_OPENAI_URL, api_key, None)
    }

    /// Create a client against a custom OpenAI-compatible endpoint.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent("tutor/openai");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        })
    }

    fn to_chat_request(&self, request: &LlmRequest) -> ChatCompletionRequest {
        let content = match request.image {
            Some(ref image) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: request.prompt.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                    },
                },
            ]),
            None => MessageContent::Text(request.prompt.clone()),
        };
        let messages = vec![ChatMessage {
            role: "user",
            content,
        }];

        ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn convert_response(
        &self,
        response: ChatCompletionResponse,
        requested_model: &str,
    ) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Llm("OpenAI response contained no message".to_string()))?;

        let usage = response
            .usage
            .map(|u| {
                LlmUsage::new(
                    u.prompt_tokens.unwrap_or(0),
                    u.completion_tokens.unwrap_or(0),
                )
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response
                .model
                .unwrap_or_else(|| requested_model.to_string()),
            usage,
        })
    }
}

/// Turn a non-success response body into a readable message.
fn upstream_error_message(body: &str) -> String {
    match serde_json::from_str::<OpenAiErrorEnvelope>(body) {
        Ok(parsed) => parsed
            .error
            .message
            .unwrap_or_else(|| "unknown upstream error".to_string()),
        Err(_) => {
            let mut end = body.len().min(MAX_ERROR_BODY_BYTES);
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body[..end].to_string()
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(model = %request.model, has_image = request.image.is_some(), "Sending chat completion request to OpenAI");

        let url = format!("{}/chat/completions", self.base_url);
        let body = self.to_chat_request(request);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to OpenAI: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            return Err(AppError::Llm(format!(
                "OpenAI API error ({}): {}",
                status,
                upstream_error_message(&text)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse OpenAI response: {}", e)))?;

        let converted = self.convert_response(parsed, &request.model)?;
        tracing::debug!(
            "OpenAI usage - Prompt: {}, Completion: {}",
            converted.usage.prompt_tokens,
            converted.usage.completion_tokens
        );

        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageAttachment;

    fn client() -> OpenAiClient {
        OpenAiClient::new("sk-test").unwrap()
    }

    #[test]
    fn test_text_request_shape() {
        let request = LlmRequest::new("What is pandas?", "gpt-4o-mini")
            .with_max_tokens(1000)
            .with_temperature(0.7);

        let json = serde_json::to_value(client().to_chat_request(&request)).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "What is pandas?");
    }

    #[test]
    fn test_image_request_uses_content_parts() {
        let request = LlmRequest::new("Explain this plot", "gpt-4o-mini")
            .with_image(ImageAttachment::new(b"hello".to_vec(), "image/jpeg"));

        let json = serde_json::to_value(client().to_chat_request(&request)).unwrap();
        let parts = json["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "Explain this plot");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/jpeg;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_convert_response() {
        let raw = r#"{
            "model": "gpt-4o-mini-2024",
            "choices": [{"message": {"role": "assistant", "content": "Use df.merge."}}],
            "usage": {"prompt_tokens": 50, "completion_tokens": 4, "total_tokens": 54}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let response = client().convert_response(parsed, "gpt-4o-mini").unwrap();

        assert_eq!(response.content, "Use df.merge.");
        assert_eq!(response.model, "gpt-4o-mini-2024");
        assert_eq!(response.usage.total_tokens, 54);
    }

    #[test]
    fn test_convert_response_without_choices_is_error() {
        let parsed: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let result = client().convert_response(parsed, "gpt-4o-mini");
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[test]
    fn test_upstream_error_message() {
        let body = r#"{"error": {"message": "You exceeded your current quota", "type": "insufficient_quota"}}"#;
        assert_eq!(upstream_error_message(body), "You exceeded your current quota");
        assert_eq!(upstream_error_message("Bad Gateway"), "Bad Gateway");
    }
}
