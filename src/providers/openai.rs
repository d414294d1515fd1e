// OpenAI-compatible adapter
//
// This adapter covers both OpenRouter (the secondary backend) and OpenAI
// (the tertiary backend) since they use compatible chat-completion APIs.
// Safety refusals surface as the "content_filter" finish reason.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ProviderFailure, QuizProvider};
use crate::generate::prompt::SYSTEM_INSTRUCTION;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Adapter for OpenAI-compatible chat-completion backends.
pub struct OpenAiCompatProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    provider_name: String,
    safety_domain: String,
}

impl OpenAiCompatProvider {
    /// Create an OpenAI adapter.
    pub fn new_openai(api_key: Option<String>) -> Result<Self> {
        Self::new(
            api_key,
            "https://api.openai.com".to_string(),
            "gpt-4o-mini".to_string(),
            "openai".to_string(),
            "openai".to_string(),
        )
    }

    /// Create an OpenRouter adapter (OpenAI-compatible API, distinct
    /// moderation layer).
    pub fn new_openrouter(api_key: Option<String>) -> Result<Self> {
        Self::new(
            api_key,
            "https://openrouter.ai/api".to_string(),
            "mistralai/mistral-7b-instruct".to_string(),
            "openrouter".to_string(),
            "openrouter".to_string(),
        )
    }

    /// Override the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API endpoint (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
        provider_name: String,
        safety_domain: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url,
            model,
            provider_name,
            safety_domain,
        })
    }
}

#[async_trait]
impl QuizProvider for OpenAiCompatProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.7,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        tracing::debug!(provider = %self.provider_name, model = %self.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.as_deref().unwrap_or_default())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderFailure::Timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                } else {
                    ProviderFailure::CallFailed(format!("{} request failed: {e}", self.provider_name))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let lowered = error_body.to_lowercase();
            if lowered.contains("content_filter") || lowered.contains("safety") {
                return Err(ProviderFailure::SafetyBlocked);
            }
            return Err(ProviderFailure::CallFailed(format!(
                "{} API returned status {status}: {error_body}",
                self.provider_name
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ProviderFailure::CallFailed(format!(
                "{} response body unreadable: {e}",
                self.provider_name
            ))
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ProviderFailure::CallFailed(format!("{} returned no choices", self.provider_name))
        })?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(ProviderFailure::SafetyBlocked);
        }

        match choice.message.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(ProviderFailure::CallFailed(format!(
                "{} returned an empty message",
                self.provider_name
            ))),
        }
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn safety_domain(&self) -> &str {
        &self.safety_domain
    }
}

// OpenAI-compatible API types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderOutcome;

    const QUIZ_JSON: &str = r#"{"questions": [{
        "question": "Quelle molécule porte l'information génétique ?",
        "options": ["L'ADN", "Le glucose", "Le lipide", "La kératine"],
        "answer": "L'ADN",
        "explanation": "L'ADN encode le patrimoine génétique."
    }]}"#;

    fn chat_body(content: &str, finish_reason: &str) -> String {
        serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": finish_reason
            }]
        })
        .to_string()
    }

    #[test]
    fn test_flavors_have_distinct_identity() {
        let openai = OpenAiCompatProvider::new_openai(Some("k".to_string())).unwrap();
        let openrouter = OpenAiCompatProvider::new_openrouter(Some("k".to_string())).unwrap();
        assert_eq!(openai.name(), "openai");
        assert_eq!(openrouter.name(), "openrouter");
        assert_ne!(openai.safety_domain(), openrouter.safety_domain());
    }

    #[test]
    fn test_missing_key_is_unconfigured() {
        assert!(!OpenAiCompatProvider::new_openai(None).unwrap().is_configured());
        assert!(!OpenAiCompatProvider::new_openrouter(Some(String::new()))
            .unwrap()
            .is_configured());
    }

    #[test]
    fn test_model_override() {
        let provider = OpenAiCompatProvider::new_openrouter(Some("k".to_string()))
            .unwrap()
            .with_model("meta-llama/llama-3.1-8b-instruct");
        assert_eq!(provider.default_model(), "meta-llama/llama-3.1-8b-instruct");
    }

    #[tokio::test]
    async fn test_successful_generation_parses_wrapped_items() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(QUIZ_JSON, "stop"))
            .create_async()
            .await;

        let provider = OpenAiCompatProvider::new_openrouter(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        match provider.generate("prompt", 3).await {
            ProviderOutcome::Success(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].answer, "L'ADN");
            }
            other => panic!("expected success, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_content_filter_finish_reason_maps_to_safety() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("", "content_filter"))
            .create_async()
            .await;

        let provider = OpenAiCompatProvider::new_openai(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        assert!(matches!(
            provider.complete("prompt").await,
            Err(ProviderFailure::SafetyBlocked)
        ));
    }

    #[tokio::test]
    async fn test_http_error_is_call_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body(r#"{"error": {"message": "rate limited"}}"#)
            .create_async()
            .await;

        let provider = OpenAiCompatProvider::new_openai(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        assert!(matches!(
            provider.complete("prompt").await,
            Err(ProviderFailure::CallFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_message_is_call_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("", "stop"))
            .create_async()
            .await;

        let provider = OpenAiCompatProvider::new_openai(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        assert!(matches!(
            provider.complete("prompt").await,
            Err(ProviderFailure::CallFailed(_))
        ));
    }
}
